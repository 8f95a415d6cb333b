//! Text form of the mapping table.
//!
//! One `resource-id : pattern` line per mapping, ids padded to the longest
//! one. Reloaded tables carry patterns only: they support `render`,
//! `render_pattern` and `match_url`, but not dispatch, and defaults are lost.

use std::sync::LazyLock;

use regex::Regex;

use crate::mapping::error::{MappingError, Result};
use crate::mapping::mapper::{Mapper, MapperOptions};

static LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:\s]+)\s*:\s*(.*?)\s*$").expect("static regex"));

/// Sort order of a serialized table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableOrder {
    #[default]
    ById,
    /// By typed URL template.
    ByUrl,
}

impl Mapper {
    /// Render every mapping as an aligned `id : pattern` line.
    pub fn serialize_table(&self, order: TableOrder) -> Vec<String> {
        let mut mappings: Vec<_> = self.mappings().collect();
        match order {
            TableOrder::ById => mappings.sort_by(|a, b| a.id().cmp(b.id())),
            TableOrder::ByUrl => mappings.sort_by(|a, b| {
                a.template()
                    .cmp(b.template())
                    .then_with(|| a.id().cmp(b.id()))
            }),
        }

        let width = mappings.iter().map(|m| m.id().len()).max().unwrap_or(0);
        mappings
            .into_iter()
            .map(|m| {
                let pattern = m.render_pattern(self.root_location(), self.options().render_trailing);
                format!("{:<width$} : {}", m.id(), pattern, width = width)
            })
            .collect()
    }

    /// Rebuild a pattern-only mapper from serialized lines.
    pub fn deserialize_table<I, S>(lines: I, options: MapperOptions) -> Result<Mapper>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapper = Mapper::new(options);
        mapper.load_table(lines)?;
        Ok(mapper)
    }

    /// Add every mapping of a serialized table. Blank lines are skipped.
    pub fn load_table<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.len();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let caps = LINE.captures(line).ok_or_else(|| MappingError::InvalidTableLine {
                line: line.to_string(),
            })?;
            self.add_static(&caps[1], &caps[2])?;
        }
        tracing::debug!(added = self.len() - before, "mapping table loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mapper {
        let mut m = Mapper::new(MapperOptions {
            root_location: Some("/app".to_string()),
            ..MapperOptions::default()
        });
        m.add_static("@@Home", "home").unwrap();
        m.add_static("@@PrintName", "users/(username)/name").unwrap();
        m.add_static("@@Int", "formatted/(id%08d)").unwrap();
        m.add_static("@@Fold", "fold/").unwrap();
        m.add_static("@@Ext", "http://example.com/x/(a)").unwrap();
        m
    }

    #[test]
    fn test_lines_are_aligned_and_sorted() {
        let lines = sample().serialize_table(TableOrder::ById);
        assert_eq!(
            lines,
            vec![
                "@@Ext       : http://example.com/x/(a)",
                "@@Fold      : /app/fold/",
                "@@Home      : /app/home",
                "@@Int       : /app/formatted/(id%08d)",
                "@@PrintName : /app/users/(username)/name",
            ]
        );
    }

    #[test]
    fn test_reload_preserves_patterns() {
        let original = sample();
        let lines = original.serialize_table(TableOrder::ByUrl);
        let reloaded = Mapper::deserialize_table(&lines, original.options().clone()).unwrap();

        assert_eq!(reloaded.len(), original.len());
        for mapping in original.mappings() {
            assert_eq!(
                reloaded.render_pattern(mapping.id()).unwrap(),
                original.render_pattern(mapping.id()).unwrap()
            );
        }
    }

    #[test]
    fn test_bad_line_is_rejected() {
        let err = Mapper::deserialize_table(["", "no separator here"], MapperOptions::default())
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidTableLine { .. }));
    }
}
