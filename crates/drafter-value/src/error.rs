use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    /// A write was attempted through a frozen [`crate::SharedValue`].
    #[error("cannot write to a frozen shared value")]
    Frozen,
}
