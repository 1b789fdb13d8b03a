use std::{env, path::PathBuf, process::ExitCode, time::Duration};

use stubgen::locale::RewriteRule;
use stubgen::translate::{run_batch, BatchOptions, HttpTranslator};
use stubgen::{coverage, generate_stubs_to_path, render_report, InterfaceSpec};

#[derive(Debug)]
struct GenerateOptions {
    specs: Vec<InterfaceSpec>,
    scan_dir: PathBuf,
    output: PathBuf,
    package: String,
    only: Vec<String>,
}

#[derive(Debug)]
struct ReportOptions {
    specs: Vec<InterfaceSpec>,
    scan_dir: PathBuf,
}

#[derive(Debug)]
struct LocalesOptions {
    locales: Vec<String>,
    all: bool,
    delay_ms: u64,
    skip_rewrite: bool,
    skip_propagate: bool,
    rules: Vec<RewriteRule>,
    endpoint: String,
    source_locale: String,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    if args.len() < 3 {
        return Err("not enough arguments".to_string());
    }

    let command = args[1].as_str();
    let target = PathBuf::from(&args[2]);

    match command {
        "generate" => {
            let options = parse_generate_options(&args[3..])?;
            run_generate(&target, &options)
        }
        "report" => {
            let options = parse_report_options(&args[3..])?;
            run_report(&target, &options)
        }
        "locales" => {
            let options = parse_locales_options(&args[3..])?;
            run_locales(&target, &options)
        }
        _ => Err(format!("unknown command '{command}'")),
    }
}

fn run_generate(definition: &PathBuf, options: &GenerateOptions) -> Result<(), String> {
    let only = if options.only.is_empty() {
        None
    } else {
        Some(options.only.as_slice())
    };

    let generated = generate_stubs_to_path(
        definition,
        &options.scan_dir,
        &options.specs,
        &options.package,
        only,
        &options.output,
    )
    .map_err(|e| e.to_string())?;

    for warning in &generated.warnings {
        eprintln!("warning: {warning}");
    }
    println!("wrote: {}", options.output.display());
    Ok(())
}

fn run_report(definition: &PathBuf, options: &ReportOptions) -> Result<(), String> {
    let (reports, warnings) =
        coverage(definition, &options.scan_dir, &options.specs).map_err(|e| e.to_string())?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }
    print!("{}", render_report(&reports));
    Ok(())
}

fn run_locales(dir: &PathBuf, options: &LocalesOptions) -> Result<(), String> {
    let mut batch = BatchOptions::new(dir);
    batch.source_locale = options.source_locale.clone();
    batch.rules = options.rules.clone();
    batch.delay = Duration::from_millis(options.delay_ms);
    batch.skip_rewrite = options.skip_rewrite;
    batch.skip_propagate = options.skip_propagate;
    batch.translate = if options.all {
        batch.targets.clone()
    } else {
        options.locales.clone()
    };

    let translator =
        HttpTranslator::new(options.endpoint.clone(), options.source_locale.clone());
    let summary = run_batch(&batch, &translator).map_err(|e| e.to_string())?;

    for (from, count) in &summary.rewrite_counts {
        println!("rewrote '{from}': {count} occurrences");
    }
    if let Some(propagated) = &summary.propagated {
        for warning in &propagated.warnings {
            eprintln!("warning: {warning}");
        }
        println!(
            "propagated '{}' to {} locale file(s)",
            options.source_locale,
            propagated.updated.len()
        );
    }
    for outcome in &summary.outcomes {
        println!(
            "{}: translated {}/{}",
            outcome.locale, outcome.translated, outcome.total
        );
        if outcome.failed > 0 {
            println!(
                "{}: failed (kept {}): {}/{}",
                outcome.locale, options.source_locale, outcome.failed, outcome.total
            );
        }
    }
    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

fn parse_generate_options(args: &[String]) -> Result<GenerateOptions, String> {
    let mut specs = Vec::new();
    let mut scan_dir: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut package = "resolver".to_string();
    let mut only = Vec::new();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--iface" => parse_iface_option(args, &mut i, &mut specs)?,
            "--scan" => {
                scan_dir = Some(PathBuf::from(take_value(args, &mut i, "--scan")?));
            }
            "--output" => {
                output = Some(PathBuf::from(take_value(args, &mut i, "--output")?));
            }
            "--package" => {
                package = take_value(args, &mut i, "--package")?;
            }
            "--only" => {
                only.push(take_value(args, &mut i, "--only")?);
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    if specs.is_empty() {
        return Err("at least one --iface Name=owner is required".to_string());
    }
    let scan_dir = scan_dir.ok_or_else(|| "--scan <dir> is required".to_string())?;
    let output = output.ok_or_else(|| "--output <file> is required".to_string())?;

    Ok(GenerateOptions {
        specs,
        scan_dir,
        output,
        package,
        only,
    })
}

fn parse_report_options(args: &[String]) -> Result<ReportOptions, String> {
    let mut specs = Vec::new();
    let mut scan_dir: Option<PathBuf> = None;
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--iface" => parse_iface_option(args, &mut i, &mut specs)?,
            "--scan" => {
                scan_dir = Some(PathBuf::from(take_value(args, &mut i, "--scan")?));
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    if specs.is_empty() {
        return Err("at least one --iface Name=owner is required".to_string());
    }
    let scan_dir = scan_dir.ok_or_else(|| "--scan <dir> is required".to_string())?;

    Ok(ReportOptions { specs, scan_dir })
}

fn parse_locales_options(args: &[String]) -> Result<LocalesOptions, String> {
    let mut locales = Vec::new();
    let mut all = false;
    let mut delay_ms = 200u64;
    let mut skip_rewrite = false;
    let mut skip_propagate = false;
    let mut rules = Vec::new();
    let mut endpoint = "http://localhost:5000/translate".to_string();
    let mut source_locale = "en".to_string();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--locales" => {
                let value = take_value(args, &mut i, "--locales")?;
                for locale in value.split(',') {
                    let locale = locale.trim();
                    if !locale.is_empty() {
                        locales.push(locale.to_string());
                    }
                }
            }
            "--all" => {
                all = true;
                i += 1;
            }
            "--delay-ms" => {
                let value = take_value(args, &mut i, "--delay-ms")?;
                delay_ms = value
                    .parse()
                    .map_err(|_| format!("invalid --delay-ms value '{value}'"))?;
            }
            "--skip-rewrite" => {
                skip_rewrite = true;
                i += 1;
            }
            "--skip-propagate" => {
                skip_propagate = true;
                i += 1;
            }
            "--replace" => {
                let value = take_value(args, &mut i, "--replace")?;
                let (from, to) = value.split_once('=').ok_or_else(|| {
                    format!("invalid --replace value '{value}' (expected From=To)")
                })?;
                if from.is_empty() {
                    return Err("--replace source text must be non-empty".to_string());
                }
                rules.push(RewriteRule::new(from, to));
            }
            "--endpoint" => {
                endpoint = take_value(args, &mut i, "--endpoint")?;
            }
            "--source" => {
                source_locale = take_value(args, &mut i, "--source")?;
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    if all && !locales.is_empty() {
        return Err("--all and --locales are mutually exclusive".to_string());
    }

    Ok(LocalesOptions {
        locales,
        all,
        delay_ms,
        skip_rewrite,
        skip_propagate,
        rules,
        endpoint,
        source_locale,
    })
}

fn parse_iface_option(
    args: &[String],
    i: &mut usize,
    specs: &mut Vec<InterfaceSpec>,
) -> Result<(), String> {
    let value = take_value(args, i, "--iface")?;
    let (name, owner) = value
        .split_once('=')
        .ok_or_else(|| format!("invalid --iface value '{value}' (expected Name=owner)"))?;
    if name.is_empty() || owner.is_empty() {
        return Err(format!(
            "invalid --iface value '{value}' (both name and owner must be non-empty)"
        ));
    }
    specs.push(InterfaceSpec::new(name, owner));
    Ok(())
}

fn take_value(args: &[String], i: &mut usize, option: &str) -> Result<String, String> {
    if *i + 1 >= args.len() {
        return Err(format!("missing value for {option}"));
    }
    let value = args[*i + 1].clone();
    *i += 2;
    Ok(value)
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!(
        "  stubgen generate <generated-source> --iface Name=owner... --scan <dir> --output <file> [--package <name>] [--only <Method>]..."
    );
    eprintln!("  stubgen report <generated-source> --iface Name=owner... --scan <dir>");
    eprintln!(
        "  stubgen locales <dir> [--locales a,b | --all] [--delay-ms N] [--skip-rewrite] [--skip-propagate] [--replace From=To]... [--endpoint URL] [--source <locale>]"
    );
    eprintln!();
    eprintln!("generate options:");
    eprintln!("  --iface Name=owner     interface name and its receiver identifier (repeatable)");
    eprintln!("  --scan <dir>           directory of source units holding existing implementations");
    eprintln!("  --output <file>        stub artifact to (over)write");
    eprintln!("  --package <name>       package clause for the artifact header (default: resolver)");
    eprintln!("  --only <Method>        restrict synthesis to listed methods, in the given order");
    eprintln!();
    eprintln!("locales options:");
    eprintln!("  --locales a,b          translate the listed locales");
    eprintln!("  --all                  translate every maintained locale");
    eprintln!("  --delay-ms N           delay between translation calls (default: 200)");
    eprintln!("  --skip-rewrite         skip the source-correction phase");
    eprintln!("  --skip-propagate       skip copying source text to the other locales");
    eprintln!("  --replace From=To      source-correction rule (repeatable)");
    eprintln!(
        "  --endpoint URL         translation service endpoint (default: http://localhost:5000/translate)"
    );
    eprintln!("  --source <locale>      source locale (default: en)");
}
