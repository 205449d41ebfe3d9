use pl0asm::{assemble_expansion, assemble_with, macros, AsmError, Config};

#[test]
fn test_error_line_after_macro() {
    let expansion = macros::expand("%macro PUSH 1\nLIT %1\n%endmacro\nPUSH 1\nFOO\n").unwrap();
    assert_eq!(
        assemble_expansion(&expansion, &Config::default()).unwrap_err(),
        AsmError::UnknownMnemonic {
            mnemonic: "FOO".into(),
            line: 5
        }
    );
}

#[test]
fn test_error_inside_expansion_reports_invocation() {
    let source = "\
%macro JUMP 1
    JMP %1
%endmacro
start:
    JUMP nowhere
";
    let expansion = macros::expand(source).unwrap();
    let err = assemble_expansion(&expansion, &Config::default()).unwrap_err();
    assert_eq!(err.line(), Some(5));
}

#[test]
fn test_origins_and_symbols_use_source_lines() {
    let source = "\
%macro PAIR 2
    LIT %1 ; first %1
    LIT %2 ; second, not %3
%endmacro

loop:
    PAIR 1 2
    ADD
    JMP loop
";
    let expansion = macros::expand(source).unwrap();
    let assembly = assemble_expansion(&expansion, &Config::default()).unwrap();
    assert_eq!(assembly.words(), &[0x1001, 0x1002, 0x2001, 0x6000]);
    assert_eq!(
        (0..4).map(|a| assembly.origin(a)).collect::<Vec<_>>(),
        vec![Some(7), Some(7), Some(8), Some(9)]
    );

    let symbols = assembly.symbols();
    assert_eq!(symbols.lines[2].line_number, 8);

    // Without the line map, lines count the expanded text.
    let plain = assemble_with(expansion.text(), &Config::default()).unwrap();
    assert_eq!(plain.origin(2), Some(5));
}
