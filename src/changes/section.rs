//! Changelog section isolation

/// Return the lines between the start marker line and the next end marker line
///
/// Both marker lines are excluded. Each kept line is prefixed with `\n`, and
/// the result is not trimmed; callers trim once they have the final fragment.
///
/// Matching is a literal prefix test on each line. A missing start marker yields
/// an empty string (the description has no changelog section), and a missing
/// end marker lets the section run to the end of the input.
pub fn extract_section(markup: &str, start_marker: &str, end_marker: &str) -> String {
    let mut inside = false;
    let mut result = String::new();

    for line in markup.split('\n') {
        if line.starts_with(start_marker) {
            inside = true;
        } else if inside {
            if line.starts_with(end_marker) {
                break;
            }
            result.push('\n');
            result.push_str(line);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "<h2>Changelog Description";
    const END: &str = "<h2>";

    #[test]
    fn test_extracts_between_markers() {
        let markup = "<h2>Intro</h2>\n<p>hi</p>\n<h2>Changelog Description</h2>\n<h3>Title</h3>\n<p>body</p>\n<h2>Other</h2>\n<p>no</p>";
        assert_eq!(
            extract_section(markup, START, END),
            "\n<h3>Title</h3>\n<p>body</p>"
        );
    }

    #[test]
    fn test_missing_start_marker_is_empty() {
        let markup = "<h2>Intro</h2>\n<p>Changelog Description</p>";
        assert_eq!(extract_section(markup, START, END), "");
    }

    #[test]
    fn test_missing_end_marker_runs_to_end() {
        let markup = "<h2>Changelog Description</h2>\n<p>a</p>\n<p>b</p>";
        assert_eq!(extract_section(markup, START, END), "\n<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_start_line_is_not_treated_as_end() {
        // The start marker itself begins with the end marker
        let markup = "<h2>Changelog Description</h2>\n<p>kept</p>";
        assert_eq!(extract_section(markup, START, END), "\n<p>kept</p>");
    }

    #[test]
    fn test_matching_is_a_literal_prefix() {
        let markup = "  <h2>Changelog Description</h2>\n<p>a</p>\n<H2>Changelog Description</H2>\n<p>b</p>";
        assert_eq!(extract_section(markup, START, END), "");

        let regexish = "a.c\n<p>x</p>";
        assert_eq!(extract_section(regexish, "a.c", "zzz"), "\n<p>x</p>");
        assert_eq!(extract_section("abc\n<p>x</p>", "a.c", "zzz"), "");
    }

    #[test]
    fn test_internal_whitespace_is_preserved() {
        let markup = "<h2>Changelog Description</h2>\n  <p> spaced </p>  \n\n<h2>End</h2>";
        assert_eq!(
            extract_section(markup, START, END),
            "\n  <p> spaced </p>  \n"
        );
    }

    #[test]
    fn test_no_start_marker_always_yields_empty() {
        let samples = [
            ("x\ny\nz", false),
            ("<h2>Changelog Description\nbody", true),
            ("body\n<h2>Changelog Description", true),
        ];
        for (markup, has_start) in samples {
            let found_start = markup.lines().any(|l| l.starts_with(START));
            assert_eq!(found_start, has_start);
            if !found_start {
                assert!(extract_section(markup, START, END).is_empty());
            }
        }
    }
}
