//! Workspace naming helpers.
//!
//! Upload filenames are untrusted. Before a filename is used on disk it is
//! reduced to a single safe path component:
//! - Path separators, drive letters and control characters are replaced
//! - Leading dots are stripped (no `..`, no hidden files)
//! - Length is bounded, keeping the tail so the extension survives

use std::path::MAIN_SEPARATOR;

/// Maximum length of the filename-derived part of a workspace name
const MAX_COMPONENT_LEN: usize = 64;

/// Fallback component for filenames that sanitize to nothing
const FALLBACK_COMPONENT: &str = "upload";

/// Reduce an untrusted filename to a safe single path component.
pub fn safe_file_component(filename: &str) -> String {
    let replaced: String = filename
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // ASCII only at this point, so byte slicing is char-aligned.
    let start = replaced.len().saturating_sub(MAX_COMPONENT_LEN);
    let component = replaced[start..].trim_start_matches('.');

    if component.is_empty() || component.chars().all(|c| c == '_') {
        return FALLBACK_COMPONENT.to_string();
    }
    component.to_string()
}

/// Random suffix for collision avoidance (not security sensitive)
pub fn random_token() -> String {
    format!("{:08x}", rand::random::<u32>())
}

/// Remove an absolute directory prefix from tool-produced text.
///
/// Paths inside `root` become relative; `root` itself becomes `.`.
pub fn scrub_root(text: &str, root: &str) -> String {
    if root.is_empty() {
        return text.to_string();
    }
    let with_separator = format!("{}{}", root.trim_end_matches(MAIN_SEPARATOR), MAIN_SEPARATOR);
    text.replace(&with_separator, "")
        .replace(root.trim_end_matches(MAIN_SEPARATOR), ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filename_is_kept() {
        assert_eq!(safe_file_component("clip_01.mp4"), "clip_01.mp4");
    }

    #[test]
    fn test_separators_and_traversal_are_neutralized() {
        let component = safe_file_component("../../etc/passwd");
        assert!(!component.contains('/'));
        assert!(!component.starts_with('.'));
        assert_eq!(component, "_.._etc_passwd");

        assert_eq!(safe_file_component(r"C:\Users\me\video.mov"), "C__Users_me_video.mov");
    }

    #[test]
    fn test_empty_or_dot_names_fall_back() {
        assert_eq!(safe_file_component(""), FALLBACK_COMPONENT);
        assert_eq!(safe_file_component(".."), FALLBACK_COMPONENT);
        assert_eq!(safe_file_component("   "), FALLBACK_COMPONENT);
        assert_eq!(safe_file_component("///"), FALLBACK_COMPONENT);
        assert_eq!(
            safe_file_component(&format!("a{}", ".".repeat(100))),
            FALLBACK_COMPONENT
        );
    }

    #[test]
    fn test_tail_after_dot_run_is_kept() {
        let name = format!("a{}b.mp4", ".".repeat(100));
        assert_eq!(safe_file_component(&name), "b.mp4");
    }

    #[test]
    fn test_long_names_keep_extension() {
        let long = format!("{}.mp4", "a".repeat(200));
        let component = safe_file_component(&long);
        assert_eq!(component.len(), MAX_COMPONENT_LEN);
        assert!(component.ends_with(".mp4"));
    }

    #[test]
    fn test_control_and_unicode_characters_replaced() {
        assert_eq!(safe_file_component("a\u{0}b\nc.mp4"), "a_b_c.mp4");
        assert_eq!(safe_file_component("vidéo.mp4"), "vid_o.mp4");
    }

    #[test]
    fn test_random_token_shape() {
        let token = random_token();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[cfg(unix)]
    #[test]
    fn test_scrub_root() {
        let root = "/tmp/clip.mp4-0badf00d";
        assert_eq!(
            scrub_root("Error: File not found - /tmp/clip.mp4-0badf00d/clip.mp4", root),
            "Error: File not found - clip.mp4"
        );
        assert_eq!(scrub_root("/tmp/clip.mp4-0badf00d", root), ".");
        assert_eq!(scrub_root("untouched", root), "untouched");
    }
}
