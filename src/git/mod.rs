//! Git command execution, history queries and commit parsing

pub mod commit;
pub mod operations;
pub mod parser;
pub mod repo;

// Re-export commonly used items
pub use commit::{short_id, Commit, SHORT_ID_LEN};
pub use operations::{GitError, GitOutput, GitRunner, SystemGit};
pub use parser::{parse_commit_line, parse_log_output, ParseError, LOG_FORMAT};
pub use repo::{Repo, Scope};
