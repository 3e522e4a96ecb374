//! Helpers handed to behavior scripts

/// Path helpers bound to the project path scripts were loaded with
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptUtils {
    project_path: String,
}

impl ScriptUtils {
    pub fn new(project_path: impl Into<String>) -> Self {
        Self { project_path: project_path.into() }
    }

    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    /// Resolve `path` against the project path.
    ///
    /// URLs with a scheme and rooted paths are returned unchanged. `.` and
    /// `..` segments are collapsed; `..` never climbs above the project root.
    pub fn abs_path(&self, path: &str) -> String {
        if path.contains("://") || path.starts_with('/') {
            return path.to_string();
        }

        let (prefix, base) = split_origin(&self.project_path);
        let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let rooted = base.starts_with('/') || !prefix.is_empty();
        let joined = segments.join("/");
        if rooted {
            format!("{prefix}/{joined}")
        } else {
            joined
        }
    }
}

/// Split `scheme://host` off a URL so `..` cannot eat the host
fn split_origin(path: &str) -> (&str, &str) {
    let Some(scheme_end) = path.find("://") else {
        return ("", path);
    };
    let rest = &path[scheme_end + 3..];
    match rest.find('/') {
        Some(slash) => path.split_at(scheme_end + 3 + slash),
        None => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_project_path() {
        let utils = ScriptUtils::new("/projects/demo");
        assert_eq!(utils.abs_path("textures/wall.png"), "/projects/demo/textures/wall.png");
        assert_eq!(utils.abs_path("./a/../b.json"), "/projects/demo/b.json");
        assert_eq!(utils.abs_path("../../../x"), "/x");
    }

    #[test]
    fn test_absolute_inputs_untouched() {
        let utils = ScriptUtils::new("/projects/demo");
        assert_eq!(utils.abs_path("/etc/data"), "/etc/data");
        assert_eq!(utils.abs_path("https://cdn.example.org/a.png"), "https://cdn.example.org/a.png");
    }

    #[test]
    fn test_url_project_path_keeps_origin() {
        let utils = ScriptUtils::new("https://example.org/projects/demo/");
        assert_eq!(utils.abs_path("scene.json"), "https://example.org/projects/demo/scene.json");
        assert_eq!(utils.abs_path("../../../up.json"), "https://example.org/up.json");

        let bare = ScriptUtils::new("https://example.org");
        assert_eq!(bare.abs_path("a"), "https://example.org/a");
    }

    #[test]
    fn test_relative_project_path_stays_relative() {
        let utils = ScriptUtils::new("assets");
        assert_eq!(utils.abs_path("a/b"), "assets/a/b");
        assert_eq!(ScriptUtils::default().abs_path("a"), "a");
    }
}
