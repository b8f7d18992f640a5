use similar::TextDiff;

/// What to show for a rewritten file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Presentation {
    #[default]
    Diff,
    Full,
}

impl Presentation {
    pub fn from_no_diff(no_diff: bool) -> Self {
        if no_diff { Self::Full } else { Self::Diff }
    }
}

#[derive(Debug, Clone)]
pub struct DiffPresenter {
    pub original_label: String,
    pub transpiled_label: String,
    pub context_radius: usize,
}

impl Default for DiffPresenter {
    fn default() -> Self {
        Self {
            original_label: "Original".to_string(),
            transpiled_label: "Transpiled".to_string(),
            context_radius: 0,
        }
    }
}

impl DiffPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = radius;
        self
    }

    /// Unified line diff from `original` to `rewritten`. Empty when both are
    /// equal.
    pub fn diff(&self, original: &str, rewritten: &str) -> String {
        TextDiff::from_lines(original, rewritten)
            .unified_diff()
            .context_radius(self.context_radius)
            .header(&self.original_label, &self.transpiled_label)
            .to_string()
    }

    pub fn render(&self, original: &str, rewritten: &str, presentation: Presentation) -> String {
        match presentation {
            Presentation::Diff => self.diff(original, rewritten),
            Presentation::Full => rewritten.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const ORIGINAL: &str = "prototype(Vendor:Hello) {\n    renderer = markdown`# Hi`\n}\n";
    const REWRITTEN: &str =
        "prototype(Vendor:Hello) {\n    renderer = Markdown.parse('# Hi')\n}\n";

    #[test]
    fn test_diff_has_fixed_header_and_no_context() {
        let diff = DiffPresenter::new().diff(ORIGINAL, REWRITTEN);

        assert_eq!(
            diff,
            "--- Original\n\
             +++ Transpiled\n\
             @@ -2 +2 @@\n\
             -    renderer = markdown`# Hi`\n\
             +    renderer = Markdown.parse('# Hi')\n"
        );
    }

    #[test]
    fn test_diff_with_context() {
        let diff = DiffPresenter::new()
            .with_context_radius(1)
            .diff(ORIGINAL, REWRITTEN);
        assert!(diff.contains(" prototype(Vendor:Hello) {\n"));
        assert!(diff.contains(" }\n"));
    }

    #[test]
    fn test_identical_buffers_yield_empty_report() {
        assert_eq!(DiffPresenter::new().diff(ORIGINAL, ORIGINAL), "");
    }

    #[test]
    fn test_swapping_inputs_swaps_signs() {
        let presenter = DiffPresenter::new();
        let forward = presenter.diff(ORIGINAL, REWRITTEN);
        let backward = presenter.diff(REWRITTEN, ORIGINAL);

        assert!(forward.contains("-    renderer = markdown`# Hi`\n"));
        assert!(backward.contains("+    renderer = markdown`# Hi`\n"));
        assert!(backward.contains("-    renderer = Markdown.parse('# Hi')\n"));
    }

    #[test]
    fn test_missing_trailing_newline_is_marked() {
        let diff = DiffPresenter::new().diff("a = x`1`", "a = 1");
        assert!(diff.contains("\\ No newline at end of file"));
    }

    #[test]
    fn test_render_full() {
        let presenter = DiffPresenter::new();
        assert_eq!(
            presenter.render(ORIGINAL, REWRITTEN, Presentation::Full),
            REWRITTEN
        );
        assert_eq!(
            presenter.render(ORIGINAL, REWRITTEN, Presentation::Diff),
            presenter.diff(ORIGINAL, REWRITTEN)
        );
    }

    #[test]
    fn test_presentation_from_flag() {
        assert_eq!(Presentation::from_no_diff(true), Presentation::Full);
        assert_eq!(Presentation::from_no_diff(false), Presentation::Diff);
        assert_eq!(Presentation::Diff.to_string(), "diff");
    }

    fn signs(diff: &str, sign: char) -> Vec<String> {
        diff.lines()
            .filter(|line| !line.starts_with("---") && !line.starts_with("+++"))
            .filter(|line| line.starts_with(sign))
            .map(|line| line[1..].to_string())
            .collect()
    }

    proptest! {
        #[test]
        fn prop_diff_is_antisymmetric(replaced in prop::collection::vec(any::<bool>(), 0..10)) {
            // distinct lines keep the longest common subsequence unique
            let a: String = (0..replaced.len()).map(|i| format!("line{}\n", i)).collect();
            let b: String = replaced
                .iter()
                .enumerate()
                .map(|(i, r)| if *r { format!("dsl{}\n", i) } else { format!("line{}\n", i) })
                .collect();
            let presenter = DiffPresenter::new();
            let forward = presenter.diff(&a, &b);
            let backward = presenter.diff(&b, &a);

            let mut removed = signs(&forward, '-');
            let mut added_back = signs(&backward, '+');
            removed.sort();
            added_back.sort();
            prop_assert_eq!(removed, added_back);

            let mut added = signs(&forward, '+');
            let mut removed_back = signs(&backward, '-');
            added.sort();
            removed_back.sort();
            prop_assert_eq!(added, removed_back);
        }

        #[test]
        fn prop_equal_buffers_have_empty_diff(a in "[a-c\n]{0,32}") {
            prop_assert_eq!(DiffPresenter::new().diff(&a, &a), "");
        }
    }
}
