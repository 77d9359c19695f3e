//! Sessions: a machine, a protocol and the state threaded between clicks.

use galaxy_types::Value;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{VmError, VmResult};
use crate::interact::{interact, Interaction};
use crate::machine::Machine;

/// Persisted form of a session's state.
///
/// The state is stored as its modulated bit string, which stays flat however
/// deeply the state nests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Fingerprint of the program the state belongs to.
    pub fingerprint: String,
    pub protocol: String,
    #[serde(with = "modulated")]
    pub state: Value,
}

mod modulated {
    use galaxy_codec::{demodulate, modulate};
    use galaxy_types::Value;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&modulate(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let bits = String::deserialize(deserializer)?;
        demodulate(&bits).map_err(de::Error::custom)
    }
}

/// Drives one protocol through successive clicks.
///
/// The state is replaced only when an interaction succeeds; a failed round
/// leaves the last confirmed state in place so the click can be retried.
#[derive(Debug)]
pub struct Session {
    machine: Machine,
    config: SessionConfig,
    state: Value,
}

impl Session {
    pub fn new(machine: Machine, config: SessionConfig) -> Self {
        let state = config.initial_state.clone();
        Self {
            machine,
            config,
            state,
        }
    }

    /// Run one interaction with the vector `(x, y)`.
    ///
    /// Terms built during the interaction are reclaimed afterwards, whether
    /// it succeeded or not.
    pub fn click(&mut self, x: i64, y: i64) -> VmResult<Interaction> {
        let protocol = self.machine.evaluator().resolve(&self.config.protocol)?;
        let outcome = interact(
            self.machine.evaluator_mut(),
            protocol,
            &self.state,
            &Value::point(x, y),
            self.config.base_color(),
        );
        self.machine.reclaim();
        let outcome = outcome?;
        log::debug!(
            "click ({x}, {y}) finished after {} rounds",
            outcome.rounds
        );
        self.state = outcome.state.clone();
        Ok(outcome)
    }

    pub fn state(&self) -> &Value {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Capture the current state as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            fingerprint: self.machine.fingerprint(),
            protocol: self.config.protocol.clone(),
            state: self.state.clone(),
        }
    }

    /// Restore a snapshot taken against the same program.
    pub fn restore(&mut self, snapshot: Snapshot) -> VmResult<()> {
        let expected = self.machine.fingerprint();
        if snapshot.fingerprint != expected {
            return Err(VmError::FingerprintMismatch {
                expected,
                found: snapshot.fingerprint,
            });
        }
        self.config.protocol = snapshot.protocol;
        self.state = snapshot.state;
        Ok(())
    }

    /// [`snapshot`](Self::snapshot) as JSON.
    pub fn snapshot_json(&self) -> VmResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// [`restore`](Self::restore) from JSON.
    pub fn restore_json(&mut self, json: &str) -> VmResult<()> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.restore(snapshot)
    }
}
