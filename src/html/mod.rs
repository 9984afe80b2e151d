//! Upload form rendering
//!
//! The form posts the token field first so the server sees it before any
//! file part.

use crate::session::TOKEN_FIELD;

/// File input field name
pub const FILE_FIELD: &str = "theFile";

/// Render the upload form with a status message above it.
///
/// The message is escaped; the token itself is never embedded in the page.
pub fn upload_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Upload</title>
</head>
<body>
<p>{message}</p>
<form action="/upload" method="POST" enctype="multipart/form-data">
<label>Upload token <input type="password" name="{token}" autocomplete="off"></label>
<label>File <input type="file" name="{file}" multiple></label>
<input type="submit" value="Upload">
</form>
</body>
</html>
"#,
        message = html_escape::encode_text(message),
        token = TOKEN_FIELD,
        file = FILE_FIELD,
    )
}
