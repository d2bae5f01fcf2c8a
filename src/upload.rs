//! Upload landing surface
//!
//! Terminals hand a dragged file to the application as a bracketed paste
//! of its path. [`parse_dropped_paths`] turns that paste back into paths;
//! [`UploadGate`] tracks the drag-active flag and forwards the first file
//! of a drop or pick to the handler supplied by the caller.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// File extension suggested by the picker. Not enforced.
pub const ACCEPT_HINT: &str = ".pdf";

/// A file chosen by the user. Nothing about it is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

impl FileHandle {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self { path, name, size }
    }

    pub fn has_accepted_extension(&self) -> bool {
        has_accepted_extension(&self.path)
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ACCEPT_HINT.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<FileHandle>),
    Pick(Vec<FileHandle>),
}

pub type UploadHandler = Box<dyn FnMut(FileHandle)>;

/// Handler used by the binary: the upload is only recorded in the log.
pub fn log_upload(file: FileHandle) {
    info!("PDF uploaded: {}", file.name);
}

pub struct UploadGate {
    drag_active: bool,
    on_upload: UploadHandler,
}

impl fmt::Debug for UploadGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadGate")
            .field("drag_active", &self.drag_active)
            .finish_non_exhaustive()
    }
}

impl Default for UploadGate {
    fn default() -> Self {
        Self::new(Box::new(log_upload))
    }
}

impl UploadGate {
    pub fn new(on_upload: UploadHandler) -> Self {
        Self {
            drag_active: false,
            on_upload,
        }
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn handle(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::DragEnter | UploadEvent::DragOver => {
                self.drag_active = true;
            }
            UploadEvent::DragLeave => {
                self.drag_active = false;
            }
            UploadEvent::Drop(files) => {
                self.drag_active = false;
                self.forward_first(files);
            }
            UploadEvent::Pick(files) => {
                self.forward_first(files);
            }
        }
    }

    fn forward_first(&mut self, files: Vec<FileHandle>) {
        let extra = files.len().saturating_sub(1);
        if let Some(file) = files.into_iter().next() {
            if extra > 0 {
                debug!("Ignoring {extra} additional file(s) beyond {}", file.name);
            }
            if !file.has_accepted_extension() {
                warn!("{} is not a {ACCEPT_HINT} file, uploading anyway", file.name);
            }
            (self.on_upload)(file);
        }
    }
}

/// Split pasted text into file paths.
///
/// Handles whitespace-separated tokens, single or double quotes,
/// backslash-escaped characters and `file://` URIs.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    paths.push(token_to_path(&current));
                    current.clear();
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        paths.push(token_to_path(&current));
    }

    paths.retain(|p| !p.as_os_str().is_empty());
    paths
}

fn token_to_path(token: &str) -> PathBuf {
    match token.strip_prefix("file://") {
        Some(rest) => {
            // Drop an optional host part ("file://localhost/tmp/x")
            let path = match rest.find('/') {
                Some(idx) => &rest[idx..],
                None => rest,
            };
            PathBuf::from(percent_decode(path))
        }
        None => PathBuf::from(token),
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_gate() -> (UploadGate, Rc<RefCell<Vec<FileHandle>>>) {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let gate = UploadGate::new(Box::new(move |file| sink.borrow_mut().push(file)));
        (gate, received)
    }

    fn handle(name: &str) -> FileHandle {
        FileHandle {
            path: PathBuf::from(name),
            name: name.to_string(),
            size: None,
        }
    }

    #[test]
    fn test_drop_of_two_files_forwards_first_only() {
        let (mut gate, received) = recording_gate();
        gate.handle(UploadEvent::Drop(vec![handle("a.pdf"), handle("b.pdf")]));

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "a.pdf");
    }

    #[test]
    fn test_pick_forwards_first_file() {
        let (mut gate, received) = recording_gate();
        gate.handle(UploadEvent::Pick(vec![handle("notes.txt"), handle("b.pdf")]));
        assert_eq!(received.borrow().as_slice(), &[handle("notes.txt")]);
    }

    #[test]
    fn test_empty_drop_forwards_nothing() {
        let (mut gate, received) = recording_gate();
        gate.handle(UploadEvent::DragEnter);
        gate.handle(UploadEvent::Drop(Vec::new()));
        assert!(received.borrow().is_empty());
        assert!(!gate.is_drag_active());
    }

    #[test]
    fn test_drag_active_flag() {
        let (mut gate, _received) = recording_gate();
        assert!(!gate.is_drag_active());
        gate.handle(UploadEvent::DragEnter);
        assert!(gate.is_drag_active());
        gate.handle(UploadEvent::DragLeave);
        assert!(!gate.is_drag_active());
        gate.handle(UploadEvent::DragOver);
        assert!(gate.is_drag_active());
        gate.handle(UploadEvent::Drop(vec![handle("a.pdf")]));
        assert!(!gate.is_drag_active());
    }

    #[test]
    fn test_pick_does_not_touch_drag_flag() {
        let (mut gate, _received) = recording_gate();
        gate.handle(UploadEvent::DragOver);
        gate.handle(UploadEvent::Pick(vec![handle("a.pdf")]));
        assert!(gate.is_drag_active());
    }

    #[test]
    fn test_accept_hint_is_advisory() {
        let (mut gate, received) = recording_gate();
        let file = handle("image.png");
        assert!(!file.has_accepted_extension());
        gate.handle(UploadEvent::Drop(vec![file]));
        assert_eq!(received.borrow().len(), 1);
        assert!(handle("Paper.PDF").has_accepted_extension());
    }

    #[test]
    fn test_parse_plain_and_escaped_paths() {
        let paths = parse_dropped_paths("/tmp/a.pdf /tmp/my\\ paper.pdf\n");
        assert_eq!(
            paths,
            vec![PathBuf::from("/tmp/a.pdf"), PathBuf::from("/tmp/my paper.pdf")]
        );
    }

    #[test]
    fn test_parse_quoted_paths() {
        let paths = parse_dropped_paths("'/tmp/one file.pdf' \"/tmp/two.pdf\"");
        assert_eq!(
            paths,
            vec![PathBuf::from("/tmp/one file.pdf"), PathBuf::from("/tmp/two.pdf")]
        );
    }

    #[test]
    fn test_parse_file_uri() {
        let paths = parse_dropped_paths("file:///home/user/Research%20Paper.pdf");
        assert_eq!(paths, vec![PathBuf::from("/home/user/Research Paper.pdf")]);

        let paths = parse_dropped_paths("file://localhost/tmp/x.pdf");
        assert_eq!(paths, vec![PathBuf::from("/tmp/x.pdf")]);
    }

    #[test]
    fn test_parse_blank_paste() {
        assert!(parse_dropped_paths("  \n\t ").is_empty());
        assert!(parse_dropped_paths("''").is_empty());
    }

    #[test]
    fn test_file_handle_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let file = FileHandle::from_path(&path);
        assert_eq!(file.name, "sample.pdf");
        assert_eq!(file.size, Some(8));

        let missing = FileHandle::from_path(dir.path().join("missing.pdf"));
        assert_eq!(missing.size, None);
    }
}
