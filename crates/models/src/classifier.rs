use onnxruntime::ndarray::Array3;
use onnxruntime::session::Session;
use std::cell::RefCell;

use crate::cache::CachedClassifier;
use crate::ModelError;

/// Run the recurrent classifier over a `(batch, 1, embedding_dim)` tensor,
/// producing one scalar score per batch item. The model promises scores in
/// [0,1]; they are passed through untouched.
pub(crate) fn run_classifier(
    handle: &CachedClassifier,
    input: Array3<f32>,
) -> Result<Vec<f32>, ModelError> {
    let batch = input.dim().0;
    if batch == 0 {
        return Ok(Vec::new());
    }

    let flat = execute_session(&handle.session, input)?;

    if flat.is_empty() {
        return Err(ModelError::Inference(
            "classifier returned no scores".into(),
        ));
    }
    if flat.len() % batch != 0 {
        return Err(ModelError::Inference(format!(
            "classifier output shape {}/{} is not divisible",
            flat.len(),
            batch
        )));
    }

    // The LSTM export emits (batch, 1); a wider trailing axis would still put
    // the sentiment score first per item.
    let chunk = flat.len() / batch;
    Ok(flat.chunks(chunk).map(|scores| scores[0]).collect())
}

fn execute_session(
    session: &RefCell<Session<'static>>,
    input: Array3<f32>,
) -> Result<Vec<f32>, ModelError> {
    let mut guard = session.borrow_mut();
    let session_ref = &mut *guard;

    if session_ref.inputs.len() != 1 {
        return Err(ModelError::Inference(format!(
            "classifier declares {} inputs, expected exactly one",
            session_ref.inputs.len()
        )));
    }

    let outputs = session_ref
        .run::<f32, f32, _>(vec![input.into_dyn()])
        .map_err(|e| ModelError::Inference(e.to_string()))?;
    let output_tensor = outputs
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::Inference("classifier returned no outputs".into()))?;

    Ok(output_tensor.iter().copied().collect())
}
