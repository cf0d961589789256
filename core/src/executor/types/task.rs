use crate::task::SubTask;

/// Common task interface for executor graph handling.
pub trait TaskLike {
    fn id(&self) -> &str;
    fn dependencies(&self) -> &[String];
}

impl TaskLike for SubTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}
