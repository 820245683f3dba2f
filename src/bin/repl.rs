use dice_calc::{Evaluation, Session};
use std::io::{self, BufRead, Write};

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn print_evaluation(eval: &Evaluation) {
    for (_, texts) in eval.history.by_level() {
        for text in texts {
            println!("  {}", text);
        }
    }
    println!("{}", eval.value);
}

/// Handles `:save name expr` and `:unsave name`. Returns `None` for plain
/// expressions.
fn command(session: &mut Session, line: &str) -> Option<dice_calc::DResult<String>> {
    let rest = line.strip_prefix(':')?;
    let (cmd, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();
    let result = match cmd {
        "save" => match args.split_once(char::is_whitespace) {
            Some((name, source)) => session
                .save(name, source.trim())
                .map(|()| format!("saved {{{}}}", name)),
            None => Err(dice_calc::DiceError::argument("usage: :save <name> <expression>")),
        },
        "unsave" => session.unsave(args).map(|()| format!("removed {{{}}}", args)),
        _ => Err(dice_calc::DiceError::argument(format!("unknown command :{}", cmd))),
    };
    Some(result)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut session = Session::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        let line = line.trim();
        if !line.is_empty() {
            match command(&mut session, line) {
                Some(Ok(msg)) => println!("{}", msg),
                Some(Err(why)) => eprintln!("Error: {}", why),
                None => match session.evaluate(line) {
                    Ok(eval) => print_evaluation(&eval),
                    Err(why) => eprintln!("Error: {}", why),
                },
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
