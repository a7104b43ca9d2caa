mod common;

use gpu_catalog::tui::{Console, InputModel, KeyBindings, MenuArgs, MenuOption, Terminal, Transition};
use proptest::prelude::*;
use std::io;

use common::console;

fn labels(n: usize) -> Vec<MenuOption<()>> {
    (0..n).map(|i| MenuOption::plain(format!("option {i}"))).collect()
}

proptest! {
    #[test]
    fn navigation_wraps_around(n in 1usize..8, moves in proptest::collection::vec(any::<bool>(), 0..40)) {
        let mut script: Vec<u8> = moves.iter().map(|down| if *down { b'j' } else { b'k' }).collect();
        script.push(b'\n');
        let (mut c, _) = console(&script);
        let downs = moves.iter().filter(|d| **d).count() as i64;
        let ups = moves.len() as i64 - downs;
        let expected = (downs - ups).rem_euclid(n as i64) as usize;
        let res = c.run(MenuArgs::new("T", labels(n))).unwrap();
        prop_assert_eq!(res.map(|s| s.index), Some(expected));
    }

    #[test]
    fn digits_pick_their_option(n in 1usize..10, d in 0u8..10) {
        let (mut c, _) = console(&[b'0' + d, b'\n']);
        let res = c.run(MenuArgs::new("T", labels(n))).unwrap();
        let expected = if d >= 1 && (d as usize) <= n { d as usize - 1 } else { 0 };
        prop_assert_eq!(res.map(|s| s.index), Some(expected));
    }

    #[test]
    fn initial_index_is_clamped(n in 1usize..6, initial in 0usize..12) {
        let (mut c, _) = console(b"\n");
        let res = c.run(MenuArgs::new("T", labels(n)).initial(initial)).unwrap();
        prop_assert_eq!(res.map(|s| s.index), Some(initial.min(n - 1)));
    }
}

#[test]
fn arrow_sequences_move_on_both_models() {
    let (mut c, _) = console(b"\x1b[B\x1bOB\x1b[A\n");
    assert_eq!(c.run(MenuArgs::new("T", labels(3))).unwrap().map(|s| s.index), Some(1));

    let out = Box::new(io::sink());
    let mut c = Console::new(Terminal::scripted(&[0xe0, b'P', 0x00, b'P', b'\r'], InputModel::Console), out);
    assert_eq!(c.run(MenuArgs::new("T", labels(3))).unwrap().map(|s| s.index), Some(2));
}

#[test]
fn custom_bindings_replace_platform_ones() {
    let bindings = KeyBindings {
        select: vec![b" ".to_vec()],
        exit: vec![b"x".to_vec()],
        down: vec![b"s".to_vec()],
        up: vec![b"w".to_vec()],
    };
    // j is no longer bound; s moves down, space selects
    let (mut c, _) = console(b"jss ");
    let args = MenuArgs::new("T", labels(3)).bindings(bindings.clone());
    assert_eq!(c.run(args).unwrap().map(|s| s.index), Some(2));

    let (mut c, _) = console(b"sx");
    let args = MenuArgs::new("T", labels(3)).bindings(bindings).default_choice(Some(0));
    assert_eq!(c.run(args).unwrap().map(|s| s.index), Some(0));
}

#[test]
fn out_of_range_default_is_no_selection() {
    let (mut c, _) = console(b"q");
    let args = MenuArgs::new("T", labels(2)).default_choice(Some(5));
    assert_eq!(c.run(args).unwrap(), None);
}

#[test]
fn end_of_input_resolves_default_and_is_reported() {
    let (mut c, out) = console(b"j");
    let args = MenuArgs::new("T", labels(3)).default_choice(Some(2));
    assert_eq!(c.run(args).unwrap().map(|s| s.index), Some(2));
    assert!(out.text().contains("EndOfInput"));
}

#[test]
fn stay_redisplays_with_picked_option_highlighted() {
    let options = vec![
        MenuOption::plain("first"),
        MenuOption::new("again", |_: &mut Console, _: usize, _: &str, _: &MenuArgs<u8>| Ok(Transition::Stay)),
        MenuOption::plain("last"),
    ];
    // pick "again", then one more Down from there lands on "last"
    let (mut c, out) = console(b"j\nj\n");
    let res = c.run(MenuArgs::new("Menu", options)).unwrap();
    assert_eq!(res.map(|s| s.label), Some("last".to_string()));
    assert_eq!(out.text().matches("Menu\n").count(), 4);
}
