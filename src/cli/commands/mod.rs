//! One module per subcommand, each exposing `execute`.

pub mod add_file;
pub mod add_note;
pub mod change_password;
pub mod completions;
pub mod decrypt;
pub mod list;
pub mod notes;
pub mod stats;

use crate::crypto::FileOperationRequest;

/// Build a request from the common `<path> [-o DIR] [-n NAME]` arguments.
pub(crate) fn file_request(
    path: &str,
    output_dir: Option<&str>,
    name: Option<&str>,
) -> FileOperationRequest {
    let mut request = FileOperationRequest::new(path);
    if let Some(dir) = output_dir {
        request = request.with_output_dir(dir);
    }
    if let Some(name) = name {
        request = request.with_output_file_name(name);
    }
    request
}
