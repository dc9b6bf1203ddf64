use ll1_parka::{Grammar, ParseEvent, PredictiveParser, Token};
use std::{fs, io::BufRead, process};

fn print_help() {
    println!("Usage: ll1-parka outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  nff: Nullable first and follow");
    println!("  ll1: LL(1) parsing table");
    println!("  trace: Trace of a predictive parse of the input");
    println!("  tree: Parse tree of the input");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -i <input>: Whitespace separated terminals to parse");
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| fail(e))
}

fn main() {
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && ["prod", "nff", "ll1", "trace", "tree"].contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut input: Option<&str> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-i"].contains(&args[i].as_str()) {
        if args[i] == "-h" || args[i] == "--help" {
            print_help();
            return;
        } else if args[i] == "-l" {
            output_format = OutputFormat::LaTeX;
        } else if args[i] == "-j" {
            output_format = OutputFormat::JSON;
        } else if args[i] == "-i" {
            i += 1;
            match args.get(i) {
                Some(text) => input = Some(text.as_str()),
                None => {
                    print_help();
                    return;
                }
            }
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return;
    }

    let source: String = if i == args.len() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<String>, _>>()
            .unwrap_or_else(|e| fail(e))
            .join("\n")
    } else {
        fs::read_to_string(args[i].as_str()).unwrap_or_else(|e| fail(e))
    };

    let g = Grammar::parse(&source).unwrap_or_else(|e| fail(e));

    let tokens = || -> Vec<Token> {
        let text = input.unwrap_or_else(|| fail("trace and tree need an input, see -i"));
        text.split_whitespace()
            .map(Token::literal)
            .chain(std::iter::once(Token::end_of_input()))
            .collect()
    };

    for output in outputs {
        if output == "prod" {
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(&g.terminal_label_set()),
                    OutputFormat::JSON => to_json(&t),
                }
            );
        }
        if output == "nff" {
            let t = g.to_non_terminal_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => t.to_json(),
                }
            );
        }
        if output == "ll1" || output == "trace" || output == "tree" {
            let table = g.generate_ll1_parsing_table().unwrap_or_else(|e| fail(e));
            let parser = PredictiveParser::new(&g, &table);

            if output == "ll1" {
                let t = table.to_output(&g);
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::Plain => t.to_plaintext(),
                        OutputFormat::LaTeX => t.to_latex(),
                        OutputFormat::JSON => t.to_json(),
                    }
                );
            } else if output == "trace" {
                let mut events: Vec<String> = Vec::new();
                parser
                    .trace(tokens(), |event| match event {
                        ParseEvent::Match(token) => events.push(format!("match {}", token)),
                        ParseEvent::Apply(production) => events.push(production.to_string()),
                    })
                    .unwrap_or_else(|e| fail(e));
                println!(
                    "{}",
                    match output_format {
                        OutputFormat::JSON => to_json(&events),
                        _ => events.join("\n"),
                    }
                );
            } else {
                let tree = parser.parse_tree(tokens()).unwrap_or_else(|e| fail(e));
                match output_format {
                    OutputFormat::JSON => println!("{}", to_json(&tree)),
                    _ => {
                        print!("{}", tree.to_plaintext());
                        println!("yield: {}", tree.yield_text());
                    }
                }
            }
        }
    }
}
