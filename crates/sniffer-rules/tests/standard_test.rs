//! Integration tests running PHP sources through the full Symfony ruleset

use sniffer_core::{CheckReport, Runner};
use sniffer_rules::RuleRegistry;

fn runner() -> Runner {
    Runner::new(RuleRegistry::default_ruleset())
}

/// Codes of the diagnostics with the given prefix, in line order
fn codes_with(report: &CheckReport, prefix: &str) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .filter(|d| d.code.starts_with(prefix))
        .map(|d| d.code.trim_start_matches(prefix).to_string())
        .collect()
}

const CLEAN: &str = r#"<?php

/**
 * A documented service.
 *
 * @author Jane Doe <jane@example.com>
 */
class Service
{
    private $items = array(
        'a',
        'b',
    );

    protected $count = 0;

    /**
     * Adds an item.
     *
     * @param string $item
     */
    public function add($item)
    {
        $this->items[] = $item;
    }

    /**
     * Counts the items.
     *
     * @return int
     */
    public function count()
    {
        $filter = function ($item) {
            return $item !== null;
        };

        return count(array_filter($this->items, $filter));
    }

    protected function reset()
    {
        $this->items = [];
    }

    private function log($message)
    {
        return;
    }
}
"#;

#[test]
fn test_clean_file_has_no_diagnostics() {
    let report = runner().check("Service.php", CLEAN);
    assert!(
        report.is_clean(),
        "unexpected diagnostics: {:?}",
        report.diagnostics
    );

    let metric = &report.metrics[0];
    assert_eq!(metric.name, "Class has doc comment");
    assert_eq!(metric.value, "yes");
}

#[test]
fn test_class_without_comment() {
    let report = runner().check("A.php", "<?php\n\nclass A\n{\n}\n");
    assert_eq!(
        codes_with(&report, "Symfony.Commenting.ClassComment."),
        vec!["Missing"]
    );
    assert!(report
        .metrics
        .iter()
        .any(|m| m.name == "Class has doc comment" && m.value == "no"));

    let report = runner().check("A.php", "<?php\n\n// A class\nclass A\n{\n}\n");
    assert_eq!(
        codes_with(&report, "Symfony.Commenting.ClassComment."),
        vec!["WrongStyle"]
    );
}

#[test]
fn test_package_fix_removes_exactly_one_line() {
    let source = "<?php\n\n/**\n * A class.\n *\n * @package Acme\n * @author Jane\n */\nclass A\n{\n}\n";
    let report = runner().fix("A.php", source);

    let expected = "<?php\n\n/**\n * A class.\n *\n * @author Jane\n */\nclass A\n{\n}\n";
    assert_eq!(report.source, expected);

    let before: Vec<&str> = source.lines().collect();
    let after: Vec<&str> = report.source.lines().collect();
    assert_eq!(before.len(), after.len() + 1);
    assert_eq!(&before[..5], &after[..5]);
    assert_eq!(&before[6..], &after[5..]);
}

#[test]
fn test_visibility_order() {
    let source = "<?php\n\n/**\n * A.\n */\nclass A\n{\n    public function a()\n    {\n    }\n\n    private function b()\n    {\n    }\n\n    protected function c()\n    {\n    }\n}\n";
    let report = runner().check("A.php", source);

    let order: Vec<usize> = report
        .diagnostics
        .iter()
        .filter(|d| d.code.ends_with(".OrderMethodsByVisibility"))
        .map(|d| d.line)
        .collect();
    assert_eq!(order, vec![16]);
}

#[test]
fn test_properties_after_methods() {
    let source = "<?php\n\n/**\n * A.\n */\nclass A\n{\n    private $a;\n\n    private function f()\n    {\n        $local = 1;\n    }\n\n    private $b;\n    private $c;\n}\n";
    let report = runner().check("A.php", source);
    let lines: Vec<usize> = report
        .diagnostics
        .iter()
        .filter(|d| d.code.ends_with(".DeclarePropertiesBeforeMethods"))
        .map(|d| d.line)
        .collect();
    assert_eq!(lines, vec![15, 16]);
}

#[test]
fn test_array_trailing_comma() {
    let mut runner = runner();

    let report = runner.fix("a.php", "<?php\n$a = array(\n 1,\n 2\n);\n");
    assert_eq!(report.source, "<?php\n$a = array(\n 1,\n 2,\n);\n");
    assert_eq!(report.fixes_applied, 1);

    let report = runner.check("a.php", "<?php\n$a = array(1, 2);\n");
    assert!(report.is_clean());
}

#[test]
fn test_return_tag_validation() {
    let with_tag = |tags: &str| {
        format!(
            "<?php\n\n/**\n * A.\n */\nclass A\n{{\n    /**\n     * Does a.\n{}     */\n    public function a()\n    {{\n        return 1;\n    }}\n}}\n",
            tags
        )
    };
    let prefix = "Symfony.Commenting.FunctionComment.";

    let report = runner().check("A.php", &with_tag("     * @return\n"));
    assert_eq!(codes_with(&report, prefix), vec!["MissingReturnType"]);

    let report = runner().check("A.php", &with_tag(""));
    assert_eq!(codes_with(&report, prefix), vec!["MissingReturn"]);

    let duplicated = with_tag("     * @return int\n     * @return int\n");
    let report = runner().check("A.php", &duplicated);
    assert_eq!(codes_with(&report, prefix), vec!["DuplicateReturn"]);

    let fixed = runner().fix("A.php", &duplicated);
    assert_eq!(fixed.source, with_tag("     * @return int\n"));
    assert!(fixed.remaining.is_clean());
}

#[test]
fn test_files_do_not_share_state() {
    let mut runner = runner();
    let first = "<?php\n\n/**\n * A.\n */\nclass A\n{\n    private function a()\n    {\n    }\n}\n";
    let second = "<?php\n\n/**\n * B.\n */\nclass B\n{\n    public $b;\n\n    public function b()\n    {\n    }\n}\n";

    assert!(runner.check("A.php", first).is_clean());
    let report = runner.check("B.php", second);
    assert_eq!(
        codes_with(&report, "Symfony.Formatting."),
        Vec::<String>::new()
    );
}

#[test]
fn test_fix_all_converges() {
    let source = "<?php\n\n/**\n * A.\n *\n * @package Acme\n * @subpackage Tools\n */\nclass A\n{\n    private $map = [\n        'a' => [\n            1\n        ]\n    ];\n\n    /**\n     * Resets.\n     *\n     * @return void\n     */\n    public function reset()\n    {\n        $this->map = [];\n    }\n}\n";
    let report = runner().fix("A.php", source);

    assert!(report.converged);
    assert!(report.remaining.is_clean(), "{:?}", report.remaining.diagnostics);
    assert!(!report.source.contains("@package"));
    assert!(!report.source.contains("@subpackage"));
    assert!(!report.source.contains("@return"));
    assert!(report.source.contains("            1,\n        ],\n    ];"));
}
