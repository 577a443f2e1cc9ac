use derp::{grammar, Grammar, GrammarError, Language};

#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn check(language: &mut Language<char>, start: &str, accepted: &[&str], rejected: &[&str]) {
    for input in accepted {
        assert!(
            language.accepts(start, input.chars()).unwrap(),
            "{start} should accept {input:?}"
        );
    }
    for input in rejected {
        assert!(
            !language.accepts(start, input.chars()).unwrap(),
            "{start} should reject {input:?}"
        );
    }
}

#[test]
fn balanced_parentheses() {
    let mut parens = grammar! {
        S = S '(' S ')' | e;
    };
    check(
        &mut parens,
        "S",
        &["", "()", "(())", "()()", "(((()())))"],
        &["(", ")", ")(", "(()", "()()()(("],
    );
}

#[test]
fn ambiguous_sums() {
    let mut sums = grammar! {
        s = s '+' s | '1';
    };
    let long_sum = format!("1{}", "+1".repeat(6));
    let dangling = format!("{}+", "1+".repeat(10));
    check(
        &mut sums,
        "s",
        &["1", "1+1", "1+1+1", long_sum.as_str()],
        &["", "+", "1+", "1+1+", "11", "1++1", dangling.as_str()],
    );
}

#[test]
fn left_recursion() {
    let mut xs = grammar! {
        S = S 'x' | e;
        T = T 'x';
    };
    check(&mut xs, "S", &["", "x", "xxxxxxxx"], &["y", "xxy", "yx"]);
    check(&mut xs, "T", &[], &["", "x", "xx"]);

    let t = xs.symbol("T").unwrap();
    assert!(xs.is_null(t));
}

#[test]
fn right_recursion() {
    let mut xs = grammar! {
        S = 'x' S | e;
    };
    check(&mut xs, "S", &["", "x", "xxxx"], &["y", "xy"]);
}

#[test]
fn lisp() {
    let mut lisp = grammar! {
        lisp = '(' item ')' | 's';
        item = item lisp | e;
    };
    check(
        &mut lisp,
        "lisp",
        &["s", "()", "(s)", "(ss)", "((s)(ss))", "(()(()))"],
        &["", "ss", "(", "(s", "s)", "(()"],
    );
    check(&mut lisp, "item", &["", "s", "s()s"], &["(", ")"]);
}

#[test]
fn mutual_recursion() {
    let mut lang = grammar! {
        top = 'a' bot bot 'b';
        bot = top | e;
    };
    check(
        &mut lang,
        "top",
        &["ab", "aabb", "aababb", "aaabbabb"],
        &["", "a", "b", "ba", "abab", "aab"],
    );
    check(&mut lang, "bot", &["", "ab"], &["a"]);
}

#[test]
fn union_and_concatenation() {
    let mut lang = grammar! {
        either = "ab" | "cd";
        both = "ab" "cd";
        words = ("ab" | "cd")*;
        maybe = 'a'? 'b'+;
        nothing = 0 | 0 'a';
    };
    check(&mut lang, "either", &["ab", "cd"], &["", "abcd", "ac"]);
    check(&mut lang, "both", &["abcd"], &["ab", "cd", "cdab"]);
    check(&mut lang, "words", &["", "ab", "cdab", "abab"], &["a", "abc"]);
    check(&mut lang, "maybe", &["b", "ab", "abbb"], &["", "a", "aab"]);
    check(&mut lang, "nothing", &[], &["", "a"]);
}

#[test]
fn rematching_allocates_nothing() {
    let mut parens = grammar! {
        S = S '(' S ')' | e;
    };
    let input = "(()(()))()";
    assert!(parens.accepts("S", input.chars()).unwrap());
    let count = parens.node_count();
    assert!(parens.accepts("S", input.chars()).unwrap());
    assert_eq!(count, parens.node_count());
}

#[test]
fn regular_input_stops_allocating() {
    fn nodes_after(input: &str) -> usize {
        let mut words = grammar! {
            words = ("ab" | "cd")*;
        };
        assert!(words.accepts("words", input.chars()).unwrap());
        words.node_count()
    }

    // every state and transition is known after the second round
    assert_eq!(nodes_after(&"abcd".repeat(8)), nodes_after(&"abcd".repeat(64)));
}

#[test]
fn nodes_grow_linearly() {
    fn nodes_after(pairs: usize) -> usize {
        let mut parens = grammar! {
            S = S '(' S ')' | e;
        };
        assert!(parens.accepts("S", "()".repeat(pairs).chars()).unwrap());
        parens.node_count()
    }

    let base = nodes_after(0);
    let small = nodes_after(32) - base;
    let large = nodes_after(64) - base;
    // quadratic growth would allocate four times as many nodes
    assert!(large <= 3 * small, "{small} nodes for 32 pairs, {large} for 64");
}

#[test]
fn custom_alphabet() {
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    enum Tok {
        Let,
        Ident(String),
        Assign,
        Num(u64),
        Semi,
    }
    use Tok::*;

    let mut g = Grammar::new();
    // stmts = stmts stmt | e
    // stmt  = let x = 1 ;
    let stmts = g.placeholder();
    let stmt = g.sequence([Let, Ident("x".into()), Assign, Num(1), Semi]);
    let more = g.concat(stmts, stmt);
    let eps = g.epsilon();
    let def = g.union(more, eps);
    g.bind(stmts, def).unwrap();

    let one = [Let, Ident("x".into()), Assign, Num(1), Semi];
    assert!(g.matches(stmts, &one).unwrap());
    assert!(g.matches(stmts, one.iter().chain(&one)).unwrap());
    assert!(!g.matches(stmts, &one[..4]).unwrap());
    assert!(!g.matches(stmts, [Let, Ident("y".into())]).unwrap());
}

#[test]
fn construction_errors() {
    let mut g = Grammar::<char>::new();
    let p = g.placeholder();
    let a = g.terminal('a');
    let ap = g.concat(a, p);
    assert_eq!(g.matches(ap, "aa".chars()), Err(GrammarError::MalformedGrammar(p)));
    assert_eq!(g.validate(ap), Err(GrammarError::MalformedGrammar(p)));

    g.bind(p, a).unwrap();
    assert_eq!(g.bind(p, a), Err(GrammarError::InvalidRebinding(p)));
    assert!(g.matches(ap, "aa".chars()).unwrap());

    let mut lang = Language::<char>::new();
    assert_eq!(
        lang.accepts("missing", "".chars()),
        Err(GrammarError::UndefinedNonterminal("missing".to_string()))
    );
}
