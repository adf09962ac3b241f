mod compiler;

use std::{path::Path, time::Instant};

use clap::{App, Arg};
use log::{log_enabled, Level};

use common::error::LangResult;

#[macro_use]
extern crate log;

fn main() {
    env_logger::init();

    let opts = parse_opts();
    if let Err(e) = run(&opts) {
        eprintln!("[ERROR] {}", e);
        std::process::exit(1);
    }
}

fn run(opts: &Options) -> LangResult<()> {
    let total_timer = Instant::now();
    let output_dir = Path::new(&opts.output_dir);

    let source = compiler::read_source(Path::new(&opts.input_file))?;

    let lex_timer = Instant::now();
    let lex_tokens = lex::lex(&source)?;
    if !opts.quiet {
        println!(
            "Lexing {} complete ({:?}).",
            &opts.input_file,
            lex_timer.elapsed()
        );
    }
    if opts.tokens {
        let tokens = compiler::tokens_to_string(&lex_tokens);
        compiler::write_output(output_dir, compiler::TOKENS_FILENAME, &tokens)?;
    }

    let parse_timer = Instant::now();
    let fn_decls = parse::parse(&lex_tokens)?;
    if !opts.quiet {
        println!(
            "Parsing {} complete ({:?}).",
            &opts.input_file,
            parse_timer.elapsed()
        );
    }
    if opts.ast {
        let ast = compiler::ast_to_string(&fn_decls);
        println!("\nAST after parsing:\n{}", ast);
        compiler::write_output(output_dir, compiler::AST_FILENAME, &ast)?;
    } else if log_enabled!(Level::Debug) {
        debug!("\nAST after parsing:\n{:#?}", fn_decls);
    }

    if opts.no_compile {
        if !opts.quiet {
            println!("Skipping code generation.");
        }
        return Ok(());
    }

    let generate_timer = Instant::now();
    let module = codegen::generate(&opts.module_name, &fn_decls)?;
    if !opts.quiet {
        println!("Generating complete ({:?}).", generate_timer.elapsed());
    }

    let ir_filename = compiler::ir_filename(&opts.module_name);
    let output_path = compiler::write_output(output_dir, &ir_filename, &module.to_string())?;

    if !opts.quiet {
        println!("Compiled in {:?}.", total_timer.elapsed());
    }
    println!("Output: {}", output_path.display());

    Ok(())
}

struct Options {
    input_file: String,
    output_dir: String,
    module_name: String,
    tokens: bool,
    ast: bool,
    no_compile: bool,
    quiet: bool,
}

fn parse_opts() -> Options {
    let matches = App::new("furc")
        .arg(
            Arg::with_name("INPUT")
                .help("The source file to compile.")
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("The directory that the output files are written to.")
                .default_value(".")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("tokens")
                .short("t")
                .long("tokens")
                .help("Set to write the lexed tokens to \"tokens.txt\".")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("ast")
                .short("a")
                .long("ast")
                .help("Set to print the AST and write it to \"ast.txt\".")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("no-compile")
                .short("n")
                .long("no-compile")
                .help("Set to stop after parsing, no IR is generated.")
                .takes_value(false)
                .required(false),
        )
        .arg(
            Arg::with_name("module")
                .short("m")
                .long("module")
                .value_name("NAME")
                .help("Set the name of the IR module, also used as the output filename.")
                .default_value("main")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Set to not print step progress to stdout.")
                .takes_value(false)
                .required(false),
        )
        .get_matches();

    // The unwraps on the values are safe since the arguments are either
    // required or have default values.
    Options {
        input_file: matches.value_of("INPUT").unwrap().into(),
        output_dir: matches.value_of("output").unwrap().into(),
        module_name: matches.value_of("module").unwrap().into(),
        tokens: matches.is_present("tokens"),
        ast: matches.is_present("ast"),
        no_compile: matches.is_present("no-compile"),
        quiet: matches.is_present("quiet"),
    }
}
