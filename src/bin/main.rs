use clap::Parser;
use infix_calc::{logging, printer, tokenizer, Evaluator, RewriteMode, Tokenizer};
use log::info;
use std::io::{self, BufRead, Write};

const VERSION: &str = "0.1";

/// Evaluates arithmetic expressions over + - * / and brackets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Use textbook shunting-yard instead of flushing the whole operator
    /// stack on a lower precedence operator.
    #[arg(long)]
    standard: bool,

    /// Print the postfix form of each expression before its result.
    #[arg(long)]
    show_postfix: bool,

    /// More log output on stderr (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Evaluate this expression and exit instead of starting the prompt.
    #[arg(allow_hyphen_values = true)]
    expression: Option<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init(logging::level_for_verbosity(args.verbose)) {
        eprintln!("{}", e);
    }

    let mode = if args.standard { RewriteMode::Standard } else { RewriteMode::FlushAll };
    let stdout = io::stdout();
    let mut calc = Calc::new(stdout.lock(), mode, args.show_postfix);

    match args.expression {
        Some(expression) => {
            let status = calc.run(trim(&expression))?;
            if status != Status::Solved {
                std::process::exit(status.exit_code());
            }
        },
        None => {
            let stdin = io::stdin();
            calc.run_prompt(stdin.lock())?;
        },
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Status {
    Solved,
    ParseError,
    EvalError,
}

impl Status {
    fn exit_code(self) -> i32 {
        match self {
            Status::Solved => 0,
            Status::ParseError => 65,
            Status::EvalError => 70,
        }
    }
}

struct Calc<Out> {
    out: Out,
    mode: RewriteMode,
    show_postfix: bool,
}

impl <Out: Write> Calc<Out> {
    fn new(out: Out, mode: RewriteMode, show_postfix: bool) -> Self {
        Self { out, mode, show_postfix }
    }

    fn run_prompt<In: BufRead>(&mut self, input: In) -> io::Result<()> {
        writeln!(self.out, "Simple math expression evaluator v {}", VERSION)?;
        writeln!(self.out, "Unary + and - is not supported. Operations: + - * /")?;
        writeln!(self.out, "Use (.) for decimal point, blank line to exit")?;
        writeln!(self.out)?;

        let mut input = input;
        let mut buffer = Vec::new();
        loop {
            write!(self.out, "(expr): ")?;
            self.out.flush()?;

            buffer.clear();
            let num_bytes = input.read_until(b'\n', &mut buffer)?;
            if num_bytes == 0 { break };

            // bytes that aren't UTF-8 become U+FFFD and fail to tokenize
            let line = String::from_utf8_lossy(&buffer);
            let line = trim(&line);
            if line.is_empty() { break };

            self.run(line)?;
        }

        Ok(())
    }

    fn run(&mut self, line: &str) -> io::Result<Status> {
        let mut tokenizer = Tokenizer::new(line);
        if let Err(e) = tokenizer.parse() {
            info!("{}", e);
            writeln!(self.out, "-- parsing error --")?;
            return Ok(Status::ParseError);
        }

        let mut evaluator = Evaluator::with_mode(tokenizer.tokens(), self.mode);
        match evaluator.solve() {
            Ok(value) => {
                if self.show_postfix {
                    writeln!(self.out, "(postfix): {}", printer::print(&evaluator.tokens()))?;
                }
                writeln!(self.out, "(result): {}", printer::number(value))?;
                Ok(Status::Solved)
            },
            Err(e) => {
                info!("{}", e);
                writeln!(self.out, "-- error --")?;
                Ok(Status::EvalError)
            },
        }
    }
}

fn trim(line: &str) -> &str {
    line.trim_matches(tokenizer::is_space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(input: &str, mode: RewriteMode, show_postfix: bool) -> io::Result<String> {
        let mut calc = Calc::new(Vec::new(), mode, show_postfix);
        calc.run_prompt(Cursor::new(input))?;
        Ok(String::from_utf8_lossy(&calc.out).into_owned())
    }

    #[test]
    fn prints_results_and_stops_at_blank_line() -> io::Result<()> {
        let out = session("2+3*4\n  (2+3)*4  \n\n9\n", RewriteMode::FlushAll, false)?;
        assert!(out.starts_with("Simple math expression evaluator v 0.1\n"));
        assert!(out.contains("(result): 14\n"));
        assert!(out.contains("(result): 20\n"));
        assert!(!out.contains("(result): 9"));
        Ok(())
    }

    #[test]
    fn reports_each_kind_of_failure() -> io::Result<()> {
        let out = session("2+#3\n(2*3+4)\n", RewriteMode::FlushAll, false)?;
        assert!(out.contains("-- parsing error --\n"));
        assert!(out.contains("-- error --\n"));
        Ok(())
    }

    #[test]
    fn stops_at_end_of_input() -> io::Result<()> {
        let out = session("1/0", RewriteMode::FlushAll, false)?;
        assert!(out.contains("(result): inf\n"));
        Ok(())
    }

    #[test]
    fn bad_utf8_only_fails_its_own_line() -> io::Result<()> {
        let mut calc = Calc::new(Vec::new(), RewriteMode::FlushAll, false);
        calc.run_prompt(Cursor::new(&b"1+1\n2\xff+3\n4*5\n"[..]))?;
        let out = String::from_utf8_lossy(&calc.out).into_owned();
        assert!(out.contains("(result): 2\n"));
        assert!(out.contains("-- parsing error --\n"));
        assert!(out.contains("(result): 20\n"));
        Ok(())
    }

    #[test]
    fn results_print_like_printf_g() -> io::Result<()> {
        let out = session("1/3\n0/0\n99999999999999999999999\n", RewriteMode::FlushAll, false)?;
        assert!(out.contains("(result): 0.333333\n"));
        assert!(out.contains("(result): nan\n"));
        assert!(out.contains("(result): 1e+23\n"));
        Ok(())
    }

    #[test]
    fn non_ascii_space_is_not_trimmed() -> io::Result<()> {
        let out = session("\u{a0}1+1\n", RewriteMode::FlushAll, false)?;
        assert!(out.contains("-- parsing error --\n"));
        Ok(())
    }

    #[test]
    fn expression_may_start_with_a_hyphen() {
        let args = Args::try_parse_from(vec!["calc", "-1+2"]).unwrap();
        assert_eq!(Some("-1+2".to_string()), args.expression);

        let args = Args::try_parse_from(vec!["calc", "-v", "--standard", "1+2"]).unwrap();
        assert_eq!(1, args.verbose);
        assert!(args.standard);
        assert_eq!(Some("1+2".to_string()), args.expression);
    }

    #[test]
    fn leading_minus_is_a_parse_error() -> io::Result<()> {
        let mut calc = Calc::new(Vec::new(), RewriteMode::FlushAll, false);
        assert_eq!(Status::ParseError, calc.run("-1+2")?);
        assert_eq!(65, Status::ParseError.exit_code());
        Ok(())
    }

    #[test]
    fn standard_mode_and_postfix_output() -> io::Result<()> {
        let out = session("(2*3+4)\n", RewriteMode::Standard, true)?;
        assert!(out.contains("(postfix): 2 3 * 4 +\n"));
        assert!(out.contains("(result): 10\n"));
        Ok(())
    }

    #[test]
    fn single_expression_status() -> io::Result<()> {
        let mut calc = Calc::new(Vec::new(), RewriteMode::FlushAll, false);
        assert_eq!(Status::Solved, calc.run("1+1")?);
        assert_eq!(Status::ParseError, calc.run("2+")?);
        assert_eq!(Status::EvalError, calc.run("(1+)2")?);
        assert_eq!(70, Status::EvalError.exit_code());
        Ok(())
    }
}
