//! A small vim-like binding grammar, written both with the pattern builders
//! and in the text syntax.

use keygrammar::{Pattern, RuneSet};

fn lit(text: &str) -> Pattern {
    Pattern::key(text).expect("valid key descriptor")
}

pub fn vim() -> Pattern {
    let digit = || Pattern::rune_set(RuneSet::range('0', '9'));
    let num = || digit().plus().cap("$0");
    let numopt = || digit().star().cap("$0");

    let counted = |key: &str, command: &str| numopt().then(lit(key)).cap(command);
    let motion = || {
        Pattern::alt([
            counted("w", "word-front -n $1"),
            counted("b", "word-back -n $1"),
            counted("e", "word-end -n $1"),
            counted("h", "cursor-left -n $1"),
            counted("j", "cursor-down -n $1"),
            counted("k", "cursor-up -n $1"),
            counted("l", "cursor-right -n $1"),
            lit("G").cap("cursor-end-buffer"),
            num().then(lit("G")).cap("cursor-line-to $1"),
        ])
    };

    let action = Pattern::alt([
        lit("Z").then(lit("Z")).cap("save; quit"),
        motion().cap("cursor-to [+ $pos [$1]]"),
    ]);
    let repeatable = Pattern::alt([
        lit("d").then(lit("d")).cap("delete-line"),
        lit("d").then(motion()).cap("delete-range $pos [+ $pos [$1]]"),
        lit("D").cap("exec 'd$'"),
    ]);

    let bindings = action.or(numopt().then(repeatable).cap("repeat -n $1 $2"));
    bindings.then(Pattern::end())
}

pub const VIM_GRAMMAR: &str = r#"
# Top level: a plain action or a repeatable one with an optional count.
bindings <- action / {numopt raction}'repeat -n $1 $2'

action   <- {'Z' 'Z'}'save; quit'
          / {move}'cursor-to [+ $pos [$1]]'

raction  <- {'d' 'd'}'delete-line'
          / {'d' move}'delete-range $pos [+ $pos [$1]]'
          / {'D'}'exec \'d$\''

move     <- {numopt 'w'}'word-front -n $1'
          / {numopt 'b'}'word-back -n $1'
          / {numopt 'e'}'word-end -n $1'
          / {numopt 'h'}'cursor-left -n $1'
          / {numopt 'j'}'cursor-down -n $1'
          / {numopt 'k'}'cursor-up -n $1'
          / {numopt 'l'}'cursor-right -n $1'
          / {'G'}'cursor-end-buffer'
          / {num 'G'}'cursor-line-to $1'

num      <- {[0-9]+}'$0'
numopt   <- {[0-9]*}'$0'
"#;
