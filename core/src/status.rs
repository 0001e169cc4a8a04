//! Per-operation request status: `Idle -> Loading -> Success | Error`.
//!
//! There is no retry state. Starting a new request always goes back to
//! `Loading`, discarding whatever the previous request produced.

use crate::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationStatus<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(ApiError),
}

impl<T> OperationStatus<T> {
    pub fn start(&mut self) {
        *self = OperationStatus::Loading;
    }

    pub fn finish(&mut self, result: Result<T, ApiError>) {
        *self = match result {
            Ok(value) => OperationStatus::Success(value),
            Err(err) => OperationStatus::Error(err),
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, OperationStatus::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OperationStatus::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            OperationStatus::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        let mut status: OperationStatus<u32> = OperationStatus::default();
        assert_eq!(status, OperationStatus::Idle);

        status.start();
        assert!(status.is_loading());

        status.finish(Ok(3));
        assert_eq!(status.value(), Some(&3));

        status.start();
        assert!(status.value().is_none(), "restart discards previous result");

        status.finish(Err(ApiError::NotFound));
        assert_eq!(status.error(), Some(&ApiError::NotFound));
    }
}
