//!  Storage is organized through [session_storage::SessionStorageImpl].
//!  The basic idea is:
//!   - There is a directory with all the sessions.
//!   - Sessions are stored in files, one for every local day a session started on.
//!   - Files are only appended to, the last line of a session wins.

pub mod entities;
pub mod session_storage;
