use blockyaml::{Budget, Error, Parser};

#[test]
fn node_budget_violation_is_reported() {
    let mut options = blockyaml::Options::default();
    if let Some(ref mut budget) = options.budget {
        budget.max_nodes = 1; // force a tiny budget to trigger the error
    }

    let parser = Parser::with_options(options);
    let err = parser.parse_str("a: 1\n").unwrap_err();
    assert!(matches!(err, Error::Budget { .. }));
    assert!(err.to_string().contains("budget"), "{err}");
}

#[test]
fn depth_budget_stops_deep_nesting() {
    let parser = Parser::with_options(blockyaml::options! {
        budget: Some(Budget {
            max_depth: 4,
            ..Budget::default()
        }),
    });
    assert!(parser.parse_str("[[[1]]]").is_ok());
    let err = parser.parse_str("[[[[[1]]]]]").unwrap_err();
    assert!(matches!(
        err,
        Error::Budget {
            breach: blockyaml::BudgetBreach::Depth { .. },
            ..
        }
    ));
}

#[test]
fn alias_expansion_budget_stops_alias_bombs() {
    // Each level multiplies the cloned subtree by 9.
    let yaml = concat!(
        "a: &a [x, x, x, x, x, x, x, x, x]\n",
        "b: &b [*a, *a, *a, *a, *a, *a, *a, *a, *a]\n",
        "c: &c [*b, *b, *b, *b, *b, *b, *b, *b, *b]\n",
        "d: &d [*c, *c, *c, *c, *c, *c, *c, *c, *c]\n",
        "e: &e [*d, *d, *d, *d, *d, *d, *d, *d, *d]\n",
    );
    let parser = Parser::with_options(blockyaml::options! {
        budget: Some(Budget {
            max_alias_nodes: 5_000,
            ..Budget::default()
        }),
    });
    let err = parser.parse_str(yaml).unwrap_err();
    assert!(matches!(
        err,
        Error::Budget {
            breach: blockyaml::BudgetBreach::AliasNodes { .. },
            ..
        }
    ));
}

#[test]
fn disabling_the_budget_is_possible() {
    let parser = Parser::with_options(blockyaml::options! {
        budget: None,
    });
    assert!(parser.parse_str("a: [1, 2, 3]\n").is_ok());
}

#[test]
fn document_budget_limits_streams() {
    let parser = Parser::with_options(blockyaml::options! {
        budget: Some(Budget {
            max_documents: 2,
            ..Budget::default()
        }),
    });
    let err = parser.parse_multi_str("---\na: 1\n---\nb: 2\n---\nc: 3\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Budget {
            breach: blockyaml::BudgetBreach::Documents { .. },
            ..
        }
    ));
}
