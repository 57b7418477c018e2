use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use asmview_core::{
    CompilationRequest, DisassemblyOutcome, DisassemblyRequest, ExecOptions, OutputFilters,
    DEFAULT_MAX_OUTPUT_BYTES,
};
use asmview_toolchain::{
    assemble_and_disassemble, run_disassembler, stage_source, tool_available, PipelineConfig,
    ProcessRunner,
};

#[derive(Parser)]
#[command(
    name = "asmview",
    version,
    about = "Assemble a source file and recover its disassembly"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a source file, locate the emitted binary, disassemble it
    Build(BuildArgs),
    /// Disassemble an existing binary
    Disasm(DisasmArgs),
    /// Probe the external tools
    Tools(ToolsArgs),
}

#[derive(Parser)]
struct BuildArgs {
    /// Assembly source file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Assembler binary name or path
    #[arg(long, default_value = "as")]
    assembler: String,

    /// Disassembler binary name or path
    #[arg(long, default_value = "objdump")]
    objdump: String,

    /// Request Intel syntax from the disassembler
    #[arg(long)]
    intel: bool,

    /// Demangle symbol names in the disassembly
    #[arg(long)]
    demangle: bool,

    /// Cap on captured bytes per stream
    #[arg(long, value_name = "BYTES")]
    max_output_bytes: Option<usize>,

    /// Kill either tool after this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Stage the build in this directory (should be empty) instead of a
    /// fresh temporary one
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Print the full build report as JSON instead of raw disassembly
    #[arg(long)]
    json: bool,

    /// Extra assembler arguments, passed through after `--`
    #[arg(last = true, value_name = "ASM_ARGS")]
    assembler_args: Vec<String>,
}

#[derive(Parser)]
struct DisasmArgs {
    /// Binary to disassemble
    #[arg(value_name = "FILE")]
    binary: PathBuf,

    /// Disassembler binary name or path
    #[arg(long, default_value = "objdump")]
    objdump: String,

    /// Request Intel syntax
    #[arg(long)]
    intel: bool,

    /// Demangle symbol names
    #[arg(long)]
    demangle: bool,

    /// Cap on captured bytes
    #[arg(long, value_name = "BYTES")]
    max_output_bytes: Option<usize>,

    /// Kill the disassembler after this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print the outcome as JSON instead of raw text
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ToolsArgs {
    /// Assembler binary to probe
    #[arg(long, default_value = "as")]
    assembler: String,

    /// Disassembler binary to probe
    #[arg(long, default_value = "objdump")]
    objdump: String,

    /// Print the probe results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Disasm(args) => run_disasm(args),
        Commands::Tools(args) => run_tools(args),
    };
    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

/// Working directory for one build: a self-cleaning temporary directory
/// unless the caller pinned one.
enum Workdir {
    Temp(tempfile::TempDir),
    Fixed(PathBuf),
}

impl Workdir {
    fn path(&self) -> &Path {
        match self {
            Workdir::Temp(dir) => dir.path(),
            Workdir::Fixed(path) => path,
        }
    }
}

fn base_exec_options(max_output_bytes: Option<usize>, timeout_ms: Option<u64>) -> ExecOptions {
    let mut options = ExecOptions::default();
    if let Some(bytes) = max_output_bytes {
        options = options.with_max_output_bytes(bytes);
    }
    if let Some(ms) = timeout_ms {
        options = options.with_timeout_ms(ms);
    }
    options
}

fn print_asm(asm: &str) {
    print!("{}", asm);
    if !asm.is_empty() && !asm.ends_with('\n') {
        println!();
    }
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let started = Instant::now();
    let config = PipelineConfig {
        assembler_bin: args.assembler.clone(),
        objdump_bin: args.objdump.clone(),
        exec: base_exec_options(args.max_output_bytes, args.timeout_ms),
        ..PipelineConfig::default()
    };

    let workdir = match &args.workdir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .map_err(|err| format!("create workdir {}: {}", dir.display(), err))?;
            Workdir::Fixed(dir.clone())
        }
        None => Workdir::Temp(
            tempfile::tempdir().map_err(|err| format!("create temp workdir: {}", err))?,
        ),
    };

    let staged = stage_source(&args.input, workdir.path(), &config.compile_filename)
        .map_err(|err| format!("stage {}: {}", args.input.display(), err))?;

    // The staged filename goes last on the assembler command line, after
    // any passthrough arguments.
    let mut assembler_args = args.assembler_args.clone();
    assembler_args.push(config.compile_filename.clone());

    let request = CompilationRequest {
        input: staged,
        assembler: config.assembler_bin.clone(),
        args: assembler_args,
        filters: OutputFilters {
            binary: false,
            intel_syntax: args.intel,
            demangle: args.demangle,
        },
    };

    let report = assemble_and_disassemble(&ProcessRunner, &config, &request)
        .map_err(|err| err.to_string())?;
    let duration_ms = started.elapsed().as_millis() as u64;

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "duration_ms": duration_ms,
            "workdir": workdir.path(),
            "report": report,
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
    } else {
        if report.result.truncated {
            eprintln!("Warning: tool output exceeded the capture limit and was truncated");
        }
        for line in &report.result.stderr {
            eprintln!("{}", line.text);
        }
        if report.result.exit_code == 0 {
            print_asm(&report.result.asm);
        }
    }

    if report.result.exit_code != 0 {
        return Err(format!(
            "assembler exited with code {}",
            report.result.exit_code
        ));
    }
    Ok(())
}

fn run_disasm(args: DisasmArgs) -> Result<(), String> {
    let request = DisassemblyRequest {
        artifact: args.binary.clone(),
        max_output_bytes: args.max_output_bytes.unwrap_or(DEFAULT_MAX_OUTPUT_BYTES),
        intel_syntax: args.intel,
        demangle: args.demangle,
    };
    let baseline = base_exec_options(args.max_output_bytes, args.timeout_ms);
    let run = run_disassembler(&ProcessRunner, &args.objdump, &request, Some(&baseline))
        .map_err(|err| err.to_string())?;

    if run.truncated {
        eprintln!("Warning: disassembly exceeded the capture limit and was truncated");
    }
    let failed_code = match &run.outcome {
        DisassemblyOutcome::ToolFailure(code) => Some(*code),
        DisassemblyOutcome::Success(_) => None,
    };
    let asm = run.outcome.into_asm_text();

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "binary": args.binary,
            "exit_code": failed_code.unwrap_or(0),
            "truncated": run.truncated,
            "asm": asm,
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
    } else {
        if let Some(code) = failed_code {
            eprintln!("Warning: objdump exited with code {}", code);
        }
        print_asm(&asm);
    }
    Ok(())
}

fn run_tools(args: ToolsArgs) -> Result<(), String> {
    let assembler_ok = tool_available(&args.assembler);
    let objdump_ok = tool_available(&args.objdump);

    if args.json {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "assembler": { "bin": args.assembler, "available": assembler_ok },
            "objdump": { "bin": args.objdump, "available": objdump_ok },
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
    } else {
        println!("assembler_bin={}", args.assembler);
        println!("assembler_available={}", assembler_ok);
        println!("objdump_bin={}", args.objdump);
        println!("objdump_available={}", objdump_ok);
    }

    if assembler_ok && objdump_ok {
        Ok(())
    } else {
        Err("one or more tools are unavailable".to_string())
    }
}
