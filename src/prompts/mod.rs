//! Prompt assembly for the generation step.
//!
//! Both builders are pure: the same inputs always give byte-identical output,
//! and nothing here performs I/O. Optional sections are declared as ordered
//! `(predicate, template)` pairs and keep their literal numerals, so a skipped
//! section leaves a gap in the numbering.

pub mod optimization;
pub mod planning;

pub use optimization::build_optimization_prompt;
pub use planning::build_planning_prompt;

/// One numbered section of a prompt
pub struct Section<C> {
    /// Heading line, including its fixed numeral
    pub heading: &'static str,
    include: fn(&C) -> bool,
    body: fn(&C) -> String,
}

impl<C> Section<C> {
    pub fn new(heading: &'static str, include: fn(&C) -> bool, body: fn(&C) -> String) -> Self {
        Self {
            heading,
            include,
            body,
        }
    }

    /// A section that is always emitted
    pub fn always(heading: &'static str, body: fn(&C) -> String) -> Self {
        Self::new(heading, |_| true, body)
    }

    pub fn is_enabled(&self, ctx: &C) -> bool {
        (self.include)(ctx)
    }

    pub fn render(&self, ctx: &C) -> String {
        let body = (self.body)(ctx);
        if body.is_empty() {
            self.heading.to_string()
        } else {
            format!("{}\n{}", self.heading, body)
        }
    }
}

/// Headings of the sections enabled for `ctx`, in order
pub fn enabled_headings<C>(sections: &[Section<C>], ctx: &C) -> Vec<&'static str> {
    sections
        .iter()
        .filter(|s| s.is_enabled(ctx))
        .map(|s| s.heading)
        .collect()
}

/// Render the enabled sections separated by blank lines
pub fn render_sections<C>(sections: &[Section<C>], ctx: &C) -> String {
    sections
        .iter()
        .filter(|s| s.is_enabled(ctx))
        .map(|s| s.render(ctx))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flags {
        extra: bool,
    }

    fn sections() -> Vec<Section<Flags>> {
        vec![
            Section::always("## 1. FIRST", |_| "body one".to_string()),
            Section::new("## 2. OPTIONAL", |f: &Flags| f.extra, |_| "body two".to_string()),
            Section::always("## 3. LAST", |_| String::new()),
        ]
    }

    #[test]
    fn test_skipped_sections_keep_numerals() {
        let ctx = Flags { extra: false };
        assert_eq!(
            enabled_headings(&sections(), &ctx),
            vec!["## 1. FIRST", "## 3. LAST"]
        );
        assert_eq!(
            render_sections(&sections(), &ctx),
            "## 1. FIRST\nbody one\n\n## 3. LAST"
        );
    }

    #[test]
    fn test_enabled_section_rendered_in_place() {
        let ctx = Flags { extra: true };
        assert_eq!(
            render_sections(&sections(), &ctx),
            "## 1. FIRST\nbody one\n\n## 2. OPTIONAL\nbody two\n\n## 3. LAST"
        );
    }
}
