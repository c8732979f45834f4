// Profile intake: validation, normalisation and resume storage.

pub mod storage;
pub mod validation;
