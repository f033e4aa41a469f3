use once_cell::sync::OnceCell;
use onnxruntime::{environment::Environment, session::Session};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokenizers::Tokenizer;

use crate::assets::EncoderAssets;
use crate::ModelError;

static ORT_ENV: OnceCell<Environment> = OnceCell::new();

// ONNX sessions are not Sync, so each thread keeps its own. First call on any
// thread pays the setup cost; subsequent calls reuse the handle.
thread_local! {
    static ENCODER_CACHE: RefCell<HashMap<EncoderCacheKey, Rc<CachedEncoder>>> =
        RefCell::new(HashMap::new());
    static CLASSIFIER_CACHE: RefCell<HashMap<PathBuf, Rc<CachedClassifier>>> =
        RefCell::new(HashMap::new());
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct EncoderCacheKey {
    model_path: PathBuf,
    tokenizer_path: PathBuf,
}

pub(crate) struct CachedEncoder {
    pub(crate) tokenizer: Tokenizer,
    pub(crate) session: RefCell<Session<'static>>,
}

impl CachedEncoder {
    fn load(assets: &EncoderAssets) -> Result<Self, ModelError> {
        let tokenizer = Tokenizer::from_file(&assets.tokenizer_path)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let session = new_session(&assets.model_path)?;

        Ok(Self {
            tokenizer,
            session: RefCell::new(session),
        })
    }
}

pub(crate) struct CachedClassifier {
    pub(crate) session: RefCell<Session<'static>>,
}

impl CachedClassifier {
    fn load(model_path: &Path) -> Result<Self, ModelError> {
        let session = new_session(model_path)?;
        Ok(Self {
            session: RefCell::new(session),
        })
    }
}

pub(crate) fn get_or_load_encoder(assets: &EncoderAssets) -> Result<Rc<CachedEncoder>, ModelError> {
    let key = EncoderCacheKey {
        model_path: assets.model_path.clone(),
        tokenizer_path: assets.tokenizer_path.clone(),
    };

    ENCODER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(handle) = cache.get(&key) {
            return Ok(handle.clone());
        }

        let handle = Rc::new(CachedEncoder::load(assets)?);
        cache.insert(key, handle.clone());
        Ok(handle)
    })
}

pub(crate) fn get_or_load_classifier(model_path: &Path) -> Result<Rc<CachedClassifier>, ModelError> {
    CLASSIFIER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(handle) = cache.get(model_path) {
            return Ok(handle.clone());
        }

        let handle = Rc::new(CachedClassifier::load(model_path)?);
        cache.insert(model_path.to_path_buf(), handle.clone());
        Ok(handle)
    })
}

fn new_session(model_path: &Path) -> Result<Session<'static>, ModelError> {
    let env = ort_environment()?;
    env.new_session_builder()
        .map_err(|e| ModelError::Inference(e.to_string()))?
        .with_model_from_file(model_path.to_path_buf())
        .map_err(|e| ModelError::Inference(e.to_string()))
}

fn ort_environment() -> Result<&'static Environment, ModelError> {
    ORT_ENV.get_or_try_init(|| {
        Environment::builder()
            .with_name("sentihotel")
            .build()
            .map_err(|e| ModelError::Inference(e.to_string()))
    })
}
