//! Benchmarks for matching keystrokes against binding grammars.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use keygrammar::{InputEvent, Pattern, Program, Vm, syntax};
use std::time::Duration;

#[path = "../tests/support/vim_grammar.rs"]
mod vim_grammar;
use vim_grammar::{VIM_GRAMMAR, vim};

fn key(c: char) -> InputEvent {
    InputEvent::char(c)
}

// Feeds `keys`, starting over whenever nothing more can match.
fn run(vm: &mut Vm, keys: &str) -> usize {
    let mut actions = 0;
    for c in keys.chars() {
        let res = vm.exec(black_box(key(c)));
        if res.has_action() {
            actions += 1;
        }
        if !res.may_continue {
            vm.reset();
        }
    }
    actions
}

fn vim_program() -> Program {
    vim().compile().expect("vim grammar compiles")
}

fn benchmark_compile(c: &mut Criterion) {
    let pattern = vim();
    c.bench_function("compile vim bindings", |b| {
        b.iter(|| black_box(pattern.compile()));
    });
}

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("parse vim grammar text", |b| {
        b.iter(|| black_box(syntax::parse_grammar(black_box(VIM_GRAMMAR))));
    });
}

fn benchmark_simple_commands(c: &mut Criterion) {
    let mut vm = Vm::new(vim_program());
    c.bench_function("simple commands (dd, ZZ, G)", |b| {
        b.iter(|| run(&mut vm, "ddZZG"));
    });
}

fn benchmark_counted_commands(c: &mut Criterion) {
    let mut vm = Vm::new(vim_program());
    c.bench_function("counted commands (25G, 3dd, d12w)", |b| {
        b.iter(|| run(&mut vm, "25G3ddd12w"));
    });
}

fn benchmark_long_count(c: &mut Criterion) {
    let mut vm = Vm::new(vim_program());
    let keys = format!("{}G", "9".repeat(64));
    c.bench_function("64 digit count", |b| {
        b.iter(|| run(&mut vm, &keys));
    });
}

fn benchmark_wide_alternation(c: &mut Criterion) {
    let bindings = Pattern::alt_all((b'a'..=b'z').map(|first| {
        let first = Pattern::key(&(first as char).to_string()).expect("valid key");
        first.then(Pattern::any_rune().cap("$0")).cap("bind $1")
    }))
    .expect("non-empty");
    let mut vm = Vm::new(bindings.compile().expect("compiles"));
    c.bench_function("26 two-key bindings", |b| {
        b.iter(|| run(&mut vm, "azbycxdw"));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = benchmark_compile,
              benchmark_parse,
              benchmark_simple_commands,
              benchmark_counted_commands,
              benchmark_long_count,
              benchmark_wide_alternation
}
criterion_main!(benches);
