use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a storyline document.
///
/// Paths are immutable: `key` and `index` return a new, longer path so the
/// walkers can hand a child path down without sharing state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocPath {
    segments: Vec<PathSegment>,
}

impl DocPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// JSON pointer form, `""` for the root.
    pub fn pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                PathSegment::Key(key) => out.push_str(&key.replace('~', "~0").replace('/', "~1")),
                PathSegment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }

    /// Dotted form used for dialogue locations, e.g. `quests.q.stages.0.dialogue`.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Key(key) => key.clone(),
                PathSegment::Index(index) => index.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer())
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;

    #[test]
    fn child_paths_leave_parent_untouched() {
        let quests = DocPath::root().key("quests");
        let stage = quests.key("basicQuest").key("stages").index(1);
        assert_eq!(quests.pointer(), "/quests");
        assert_eq!(stage.pointer(), "/quests/basicQuest/stages/1");
        assert_eq!(stage.dotted(), "quests.basicQuest.stages.1");
    }

    #[test]
    fn pointer_escapes_reserved_characters() {
        let path = DocPath::root().key("set").key("a/b~c");
        assert_eq!(path.pointer(), "/set/a~1b~0c");
        assert_eq!(DocPath::root().pointer(), "");
    }
}
