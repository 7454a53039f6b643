use std::io::Write;

/// Scripts larger than this are refused.
const MAX_SCRIPT_BYTES: u64 = 1024 * 1024;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match args.len() {
        1 => run_repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("usage: lupine [script]");
            std::process::exit(1);
        }
    }
}

fn run_file(path: &str) {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_SCRIPT_BYTES => {
            eprintln!("lupine: {path}: script larger than 1 MiB");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("lupine: cannot open {path}: {e}");
            std::process::exit(1);
        }
        Ok(_) => {}
    }

    let source = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("lupine: cannot read {path}: {e}");
            std::process::exit(1);
        }
    };

    match lupine_vm::interpret(&source) {
        Ok(output) => {
            let mut stdout = std::io::stdout();
            if stdout.write_all(&output).and_then(|_| stdout.flush()).is_err() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("lupine: {path}:{e}");
            std::process::exit(1);
        }
    }
}

/// Read-eval-print loop. Every line is interpreted on its own; globals do
/// not persist between lines.
fn run_repl() {
    let config = rustyline::config::Config::builder()
        .auto_add_history(true)
        .build();

    let mut rl = match rustyline::DefaultEditor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("lupine: cannot initialize REPL: {e}");
            std::process::exit(1);
        }
    };

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match lupine_vm::interpret(line.as_bytes()) {
                    Ok(output) => {
                        let mut stdout = std::io::stdout();
                        let _ = stdout.write_all(&output);
                        let _ = stdout.flush();
                    }
                    Err(e) => eprintln!("lupine: {e}"),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl-C: drop the line, keep the session.
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("lupine: readline error: {e}");
                break;
            }
        }
    }
}
