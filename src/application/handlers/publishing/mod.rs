//! Publishing handlers - branch, commit, push and pull request.

mod change_publisher;

pub use change_publisher::{
    ChangePublisher, CommitIdentity, PublishCommand, PublishError, PublishedChange,
};
