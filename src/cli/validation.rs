use crate::cli::args::CliArgs;

pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

pub fn validate_timeout(timeout: u64) -> Result<(), String> {
    if timeout > MAX_TIMEOUT_SECONDS {
        return Err(format!(
            "invalid timeout {timeout}, expected at most {MAX_TIMEOUT_SECONDS} seconds"
        ));
    }
    Ok(())
}

// one-shot actions are mutually exclusive
pub fn validate(args: &CliArgs) -> Result<(), String> {
    let actions = [args.area.is_some(), args.random, args.meal.is_some()]
        .iter()
        .filter(|set| **set)
        .count();
    if actions > 1 {
        return Err("use only one of --area, --random or --meal".to_string());
    }
    if let Some(area) = args.area.as_deref() {
        if area.trim().is_empty() {
            return Err("invalid --area, expected a cuisine name".to_string());
        }
    }
    if let Some(meal) = args.meal.as_deref() {
        if meal.trim().is_empty() {
            return Err("invalid --meal, expected a recipe id".to_string());
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(raw) = args.api_base.as_deref() {
        crate::api::normalize_api_base(raw).map_err(|e| e.to_string())?;
    }
    if let Some(timeout) = args.timeout {
        validate_timeout(timeout)?;
    }
    Ok(())
}
