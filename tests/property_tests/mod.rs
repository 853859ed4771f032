use proptest::prelude::*;
use rift::{
    ast::node_count,
    coordinator::passes::{ConstantFolding, OptimizationPass},
    renderer,
    tokenizer::{
        pattern::{classify, PatternRule},
        token::{Token, TokenCategory, TokenStream, INITIAL_CAPACITY},
    },
    AstNode, BinaryOperator,
};

const ALPHABET: [char; 4] = ['a', 'b', 'c', 'd'];

fn category() -> impl Strategy<Value = TokenCategory> {
    prop_oneof![
        Just(TokenCategory::Identifier),
        Just(TokenCategory::Number),
        Just(TokenCategory::Operator),
        Just(TokenCategory::Whitespace),
    ]
}

// A rule matching non-empty words over a subset of the alphabet, with a
// narrow priority range so ties are common.
fn char_class_rule() -> impl Strategy<Value = (Vec<char>, TokenCategory, i32)> {
    (
        proptest::sample::subsequence(ALPHABET.to_vec(), 1..=ALPHABET.len()),
        category(),
        0..4i32,
    )
}

fn operator() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![
        Just(BinaryOperator::Add),
        Just(BinaryOperator::Subtract),
        Just(BinaryOperator::Multiply),
        Just(BinaryOperator::Divide),
    ]
}

fn ast() -> impl Strategy<Value = AstNode> {
    let leaf = prop_oneof![
        (0u32..20).prop_map(|n| AstNode::number(n.to_string())),
        "[a-z]{1,3}".prop_map(|name: String| AstNode::identifier(name)),
    ];
    leaf.prop_recursive(6, 64, 2, |inner| {
        (operator(), inner.clone(), inner).prop_map(|(op, l, r)| AstNode::binary(op, l, r))
    })
}

fn token(i: usize) -> Token {
    Token {
        category: TokenCategory::Identifier,
        text: format!("t{}", i),
        line: 1,
        column: i + 1,
        priority: 100,
    }
}

proptest! {
    #[test]
    fn classify_picks_first_rule_with_highest_priority(
        defs in proptest::collection::vec(char_class_rule(), 0..6),
        text in "[a-d]{1,4}",
    ) {
        let rules: Vec<PatternRule> = defs
            .iter()
            .map(|(chars, category, priority)| {
                let class: String = chars.iter().collect();
                PatternRule::new(format!("[{}]+", class), *category, *priority)
            })
            .collect();

        let mut expected: Option<(TokenCategory, i32)> = None;
        for (chars, category, priority) in &defs {
            let matches = text.chars().all(|c| chars.contains(&c));
            if matches && expected.map_or(true, |(_, best)| *priority > best) {
                expected = Some((*category, *priority));
            }
        }

        let result = classify(&rules, &text);
        match expected {
            Some((category, priority)) => {
                prop_assert_eq!(result.category, category);
                prop_assert_eq!(result.priority, priority);
                prop_assert!(result.rule.is_some());
            }
            None => {
                prop_assert_eq!(result.category, TokenCategory::Unknown);
                prop_assert_eq!(result.priority, 0);
            }
        }
    }

    #[test]
    fn node_count_follows_recursion(tree in ast()) {
        let count = node_count(Some(&tree));
        prop_assert_eq!(count, 1 + node_count(tree.left()) + node_count(tree.right()));
        prop_assert_eq!(node_count(None), 0);
        // Full binary tree: every operator has two children.
        let leaves = renderer::render(&tree).unwrap().matches("(Identifier").count()
            + renderer::render(&tree).unwrap().matches("(Number").count();
        prop_assert_eq!(count, 2 * leaves - 1);
    }

    #[test]
    fn token_stream_growth_preserves_tokens(n in 0usize..200) {
        let mut stream = TokenStream::new();
        prop_assert!(stream.capacity() >= INITIAL_CAPACITY);
        for i in 0..n {
            stream.push(token(i)).unwrap();
        }
        prop_assert_eq!(stream.len(), n);
        prop_assert!(stream.capacity() >= n);
        for (i, t) in stream.iter().enumerate() {
            prop_assert_eq!(t, &token(i));
        }
    }

    #[test]
    fn constant_folding_is_idempotent(tree in ast()) {
        let once = ConstantFolding.run(tree.clone());
        let twice = ConstantFolding.run(once.clone());
        prop_assert!(once.node_count() <= tree.node_count());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn rendering_is_deterministic(tree in ast()) {
        prop_assert_eq!(
            renderer::render(&tree).unwrap(),
            renderer::render(&tree.clone()).unwrap()
        );
    }
}
