use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use encoding_rs_io::DecodeReaderBytesBuilder;
use log::{error, info};

use crate::environment::Environment;
use crate::evaluator::eval_program;
use crate::lexer::Lexer;
use crate::parser::Parser;

/*
The prompt loop and file runner are the host shell around the core pipeline - they own I/O and
exit-code conventions, nothing the evaluator or parser care about. `run_file` exits 65 on a
syntax error and 70 on a runtime error, the conventional sysexits.h 65/70 codes for syntax vs.
runtime errors. The REPL never exits non-zero; a bad line just resets and waits for the next
one.
*/
pub static HAD_ERROR: AtomicBool = AtomicBool::new(false);
pub static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

pub fn run_file(path: &str) -> io::Result<()> {
    let file = std::fs::File::open(Path::new(path))?;
    let mut decoder = DecodeReaderBytesBuilder::new().build(file);
    let mut source = String::new();
    decoder.read_to_string(&mut source)?;

    let env = Environment::new();
    run(&source, &env);

    if HAD_ERROR.load(Ordering::Relaxed) {
        std::process::exit(65);
    }
    if HAD_RUNTIME_ERROR.load(Ordering::Relaxed) {
        std::process::exit(70);
    }
    Ok(())
}

pub fn run_prompt() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let env = Environment::new();

    loop {
        print!(">> ");
        let _ = stdout.flush();

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line).unwrap_or(0);
        if bytes_read == 0 {
            break;
        }

        run(&line, &env);
        HAD_ERROR.store(false, Ordering::Relaxed);
        HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
    }
}

fn run(source: &str, env: &Rc<Environment>) {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        HAD_ERROR.store(true, Ordering::Relaxed);
        print_parse_errors(parser.errors());
        return;
    }

    info!("evaluating program with {} statement(s)", program.statements.len());
    let value = eval_program(&program, env);
    if value.is_error() {
        HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
        error!("{}", value.inspect());
    }
    println!("{}", value.inspect());
}

fn print_parse_errors(errors: &[String]) {
    eprintln!("parser encountered {} error(s):", errors.len());
    for message in errors {
        eprintln!("\t{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_prints_the_result_of_a_valid_program() {
        let env = Environment::new();
        run("5 + 5", &env);
        assert!(!HAD_ERROR.load(Ordering::Relaxed));
    }

    #[test]
    fn run_flags_syntax_errors_without_evaluating() {
        HAD_ERROR.store(false, Ordering::Relaxed);
        let env = Environment::new();
        run("let x 5;", &env);
        assert!(HAD_ERROR.load(Ordering::Relaxed));
        HAD_ERROR.store(false, Ordering::Relaxed);
    }

    #[test]
    fn run_flags_runtime_errors() {
        HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
        let env = Environment::new();
        run("5 + true", &env);
        assert!(HAD_RUNTIME_ERROR.load(Ordering::Relaxed));
        HAD_RUNTIME_ERROR.store(false, Ordering::Relaxed);
    }

    #[test]
    fn environment_persists_across_calls_to_run_within_a_session() {
        let env = Environment::new();
        run("let x = 41;", &env);
        assert_eq!(env.get("x").map(|v| v.inspect()), Some("41".to_string()));
    }
}
