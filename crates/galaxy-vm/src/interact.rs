//! The interaction driver.
//!
//! One interaction applies the protocol to `(state, vector)` and inspects
//! the returned `(flag, new_state, data)`. A zero flag ends it: the data
//! is rendered and the new state handed back. Any other flag sends the data
//! to the peer and starts the next round with the decoded answer as the
//! vector. Rounds run in a loop, never by recursion.

use galaxy_codec::{demodulate, modulate};
use galaxy_eval::{Color, EvalError, Evaluator};
use galaxy_types::{Primitive, TermId, Value};

use crate::error::{VmError, VmResult};

/// Result of an interaction that finished locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// State to pass to the next interaction.
    pub state: Value,
    /// The list of images rendered.
    pub data: Value,
    /// Protocol applications performed, including the final one.
    pub rounds: usize,
}

/// Run `protocol` from `state` with `vector` until it returns a zero flag.
///
/// Each round forces the protocol result completely. When the interaction
/// finishes the renderer is cleared, the drawing color reset to
/// `base_color`, and `ap multipledraw data` forced so every image is drawn.
/// Errors abort the interaction; the caller still holds `state`.
pub fn interact(
    evaluator: &mut Evaluator,
    protocol: TermId,
    state: &Value,
    vector: &Value,
    base_color: Color,
) -> VmResult<Interaction> {
    let mut state = state.clone();
    let mut vector = vector.clone();
    let mut rounds = 0;
    loop {
        rounds += 1;
        let state_term = evaluator.from_value(&state)?;
        let vector_term = evaluator.from_value(&vector)?;
        let call = evaluator
            .store_mut()
            .app2(protocol, state_term, vector_term)
            .map_err(EvalError::from)?;
        let result = evaluator.to_value(call).map_err(VmError::from_eval)?;
        let (flag, new_state, data) = split_result(&result)?;
        log::debug!("round {rounds}: flag {flag}, state {new_state}");

        if flag == 0 {
            render(evaluator, &data, base_color)?;
            return Ok(Interaction {
                state: new_state,
                data,
                rounds,
            });
        }

        let request = modulate(&data);
        log::debug!("round {rounds}: sending {} bits", request.len());
        let response = evaluator
            .host_mut()
            .send(&request)
            .map_err(VmError::from_eval)?;
        vector = demodulate(response.trim())?;
        state = new_state;
    }
}

/// Destructure a protocol result `(flag, new_state, data)`.
fn split_result(result: &Value) -> VmResult<(i64, Value, Value)> {
    let malformed = || VmError::MalformedResult(result.to_string());
    match result.as_list().as_deref() {
        Some(&[flag, new_state, data]) => {
            let flag = flag.as_number().ok_or_else(malformed)?;
            Ok((flag, new_state.clone(), data.clone()))
        }
        _ => Err(malformed()),
    }
}

fn render(evaluator: &mut Evaluator, data: &Value, base_color: Color) -> VmResult<()> {
    evaluator.host_mut().begin_frame(base_color);
    let images = evaluator.from_value(data)?;
    let pictures = evaluator
        .store_mut()
        .call1(Primitive::MultipleDraw, images)
        .map_err(EvalError::from)?;
    evaluator.to_value(pictures).map_err(VmError::from_eval)?;
    Ok(())
}
