use colored::Colorize;
use std::path::Path;

use cvep_attention::local;

const USAGE: &str = "usage:
  cvep-attention plan <config.yaml> [out_dir]
  cvep-attention audit <config.yaml> [n_seeds]
  cvep-attention markers <markers.jsonl>";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("{}", USAGE);
        return;
    }

    let result = match args[1].as_str() {
        "plan" => {
            let out_dir = args.get(3).map(String::as_str).unwrap_or("session");
            local::plan::run(Path::new(&args[2]), Path::new(out_dir)).map(|_| ())
        }
        "audit" => {
            let n_seeds = match args.get(3).map(|arg| arg.parse::<u64>()) {
                None => 1000,
                Some(Ok(n)) => n,
                Some(Err(_)) => {
                    println!("{} n_seeds must be an integer", "Error:".red().bold());
                    std::process::exit(2);
                }
            };
            local::audit::run(Path::new(&args[2]), n_seeds).map(|_| ())
        }
        "markers" => local::labels::run(Path::new(&args[2])).map(|_| ()),
        _ => {
            println!("Invalid command '{}'\n{}", args[1], USAGE);
            return;
        }
    };

    if let Err(error) = result {
        eprintln!("{} {}", "Error:".red().bold(), error);
        std::process::exit(1);
    }
}
