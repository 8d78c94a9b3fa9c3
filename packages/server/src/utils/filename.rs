use common::form::allowed_image_extension;

/// Reasons an uploaded file name is refused.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `..`.
    PathTraversal,
    /// Filename contains null bytes.
    NullByte,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Extension is not one of the accepted image types.
    NotAnImage,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "No selected file",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::NotAnImage => "File not allowed",
        }
    }
}

/// Checks the client-supplied name of a schedule photo and returns it trimmed.
///
/// The name is only echoed in logs and responses, never used as a path, but it
/// must still look like a single plain file. Characters are checked left to
/// right and the first offending one decides the error.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let name = filename.trim();
    if name.is_empty() {
        return Err(FilenameError::Empty);
    }

    for c in name.chars() {
        match c {
            '\0' => return Err(FilenameError::NullByte),
            '/' | '\\' => return Err(FilenameError::ContainsPathSeparator),
            // CR and LF would split the log line carrying the name.
            c if c.is_ascii_control() => return Err(FilenameError::ControlCharacter),
            _ => {}
        }
    }

    match name {
        ".." => Err(FilenameError::PathTraversal),
        _ if name.starts_with('.') => Err(FilenameError::Hidden),
        _ => Ok(name),
    }
}

/// Validates an uploaded schedule image name and returns it with its
/// lowercased extension.
pub fn validate_image_filename(filename: &str) -> Result<(&str, String), FilenameError> {
    let name = validate_flat_filename(filename)?;
    let ext = allowed_image_extension(name).ok_or(FilenameError::NotAnImage)?;
    Ok((name, ext))
}
