//! # Geopile CLI
//!
//! Runs pile capacity calculations from the terminal.
//!
//! ```text
//! pile_cli [project.geo]
//! ```
//!
//! With a project file every pile design in it is calculated against its
//! borehole. Without one, a built-in boring is run through all three methods.
//! Set `RUST_LOG` (e.g. `RUST_LOG=pile_core=debug`) for engine tracing.

use std::path::Path;
use std::process::ExitCode;

use pile_core::calculations::{
    aoki_velloso, decourt_profile, decourt_quaresma, AokiVellosoFactors, AokiVellosoInput,
    CalculationOutput, DecourtProfileInput, DecourtProfileResult, DecourtQuaresmaFactors,
    DecourtQuaresmaInput,
};
use pile_core::coefficients::{
    AokiVellosoCoefficients, AokiVellosoTable, DecourtQuaresmaCoefficients, DecourtQuaresmaTable,
    SegmentCoefficientTable,
};
use pile_core::errors::CalcError;
use pile_core::pile::{ExecutionType, PileGeometry};
use pile_core::soil::{SoilLayer, Stratigraphy};
use pile_core::units::{KiloNewtons, Meters, TonneForce};
use pile_core::{load_project, CalcResult};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const RULE: &str = "═══════════════════════════════════════";

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: could not install log subscriber");
    }

    println!("Geopile CLI - Pile Axial Capacity");
    println!("=================================");
    println!();

    let outcome = match std::env::args().nth(1) {
        Some(path) => run_project(Path::new(&path)),
        None => run_demo(),
    };

    match outcome {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{} item(s) failed", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Runs every item of the project; returns how many failed.
fn run_project(path: &Path) -> CalcResult<usize> {
    let project = load_project(path)?;
    println!(
        "Project {} ({}) - engineer: {}",
        project.meta.job_id, project.meta.client, project.meta.engineer
    );
    println!("{} borehole(s), {} item(s)", project.boreholes.len(), project.item_count());
    println!();

    let mut failures = 0;
    for (id, result) in project.calculate_all() {
        let label = project.get_item(&id).map(|item| item.label()).unwrap_or_default();
        match result {
            Ok(output) => print_output(label, &output),
            Err(e) => {
                failures += 1;
                println!("{}: FAILED", label);
                print_error(&e);
            }
        }
    }
    info!(failures, "project run finished");
    Ok(failures)
}

fn run_demo() -> CalcResult<usize> {
    println!("No project file given. Running the built-in example...");
    println!();

    let layers = Stratigraphy::new(vec![
        SoilLayer::new(0.0, 2.0, "Areia", 15.0),
        SoilLayer::new(2.0, 5.0, "Argila", 8.0),
    ])?;
    let geometry = PileGeometry::new(0.2, 1.0);

    let av_table = AokiVellosoTable::new()
        .with("Areia", AokiVellosoCoefficients::new(0.1, 0.5))
        .with("Argila", AokiVellosoCoefficients::new(0.05, 0.7));
    let av = aoki_velloso::calculate(
        &AokiVellosoInput {
            label: "Demo".to_string(),
            layers: layers.clone(),
            tip_spt: 20.0,
            geometry: geometry.clone(),
            factors: AokiVellosoFactors::default(),
            tip_soil_type: Some("Areia".into()),
        },
        &av_table,
    )?;
    print_output("Demo", &CalculationOutput::AokiVelloso(av));

    let dq_table = DecourtQuaresmaTable::new()
        .with("Areia", DecourtQuaresmaCoefficients::new(0.5, 5.0))
        .with("Argila", DecourtQuaresmaCoefficients::new(0.3, 3.0));
    let dq = decourt_quaresma::calculate(
        &DecourtQuaresmaInput {
            label: "Demo".to_string(),
            layers,
            tip_spt: 20.0,
            geometry,
            factors: DecourtQuaresmaFactors::default(),
            tip_soil_type: Some("Areia".into()),
        },
        &dq_table,
    )?;
    print_output("Demo", &CalculationOutput::DecourtQuaresma(dq));

    let profile = decourt_profile::calculate(
        &DecourtProfileInput {
            label: "Demo profile".to_string(),
            layers: Stratigraphy::new(vec![
                SoilLayer::new(0.0, 3.0, "Argila Arenosa", 6.0),
                SoilLayer::new(3.0, 6.0, "Silte Argiloso", 12.0),
                SoilLayer::new(6.0, 10.0, "Areia", 28.0),
            ])?,
            ground_elevation_m: 100.0,
            cutoff_elevation_m: 99.0,
            tip_elevation_m: 91.5,
            geometry: PileGeometry::circular(Meters(0.4))
                .with_execution_type(ExecutionType::ContinuousFlightAuger),
        },
        SegmentCoefficientTable::published(),
    )?;
    print_output("Demo profile", &CalculationOutput::DecourtProfile(profile));
    Ok(0)
}

fn print_output(label: &str, output: &CalculationOutput) {
    println!("{}", RULE);
    println!("  {} - {}", label, output.method());
    println!("{}", RULE);
    match output {
        CalculationOutput::AokiVelloso(r) => {
            println!("  Tip soil:  {} (N = {:.0})", r.tip_soil_type, r.tip_spt_used);
            println!("  Q_tip   = {:>10.2} kN", r.tip_load_kn);
            println!("  Q_shaft = {:>10.2} kN", r.shaft_load_kn);
            println!("  Q_ult   = {}", load(r.ultimate_load_kn));
        }
        CalculationOutput::DecourtQuaresma(r) => {
            println!("  Tip soil:  {} (N = {:.1})", r.tip_soil_type, r.tip_spt_used);
            println!("  q_p     = {:>10.2} kPa", r.unit_tip_resistance_kpa);
            println!("  Q_tip   = {:>10.2} kN", r.tip_load_kn);
            println!("  Q_shaft = {:>10.2} kN", r.shaft_load_kn);
            println!("  Q_ult   = {}", load(r.ultimate_load_kn));
            println!("  Q_adm   = {}", load(r.admissible_load_kn));
        }
        CalculationOutput::DecourtProfile(r) => print_profile(r),
    }
    println!();
    print_json("JSON Output:", output);
}

fn print_profile(r: &DecourtProfileResult) {
    println!("  Execution: {}", r.execution_type);
    println!(
        "  {:>6} {:>6}  {:<16} {:>4} {:>9} {:>9} {:>9}",
        "top", "bottom", "soil", "N", "q_l kPa", "ΣQ_l kN", "Q_tip kN"
    );
    for s in &r.segments {
        let soil = s.soil_type.as_ref().map(|t| t.as_str()).unwrap_or("-");
        println!(
            "  {:>6.2} {:>6.2}  {:<16} {:>4.0} {:>9.2} {:>9.2} {:>9.2}{}",
            s.depth_top_m,
            s.depth_bottom_m,
            soil,
            s.spt,
            s.unit_shaft_kpa,
            s.shaft_component_kn,
            s.tip_component_kn,
            if s.degraded { "  [NO DATA]" } else { "" }
        );
    }
    println!();
    let no_data = if r.tip_degraded { "  [NO DATA]" } else { "" };
    println!("  Q_tip   = {:>10.2} kN{}", r.tip_load_kn, no_data);
    println!("  Q_shaft = {:>10.2} kN", r.shaft_load_kn);
    println!("  Q_adm   = {}", load(r.admissible_load_kn));
    if !r.is_complete() {
        println!("  WARNING: {} segment(s) without data", r.degraded_segment_count());
    }
}

/// Load in kN with the tonne-force equivalent
fn load(kn: f64) -> String {
    let tf = TonneForce::from(KiloNewtons(kn));
    format!("{:>10.2} kN ({:.2} tf)", kn, tf.0)
}

fn print_json<T: Serialize>(title: &str, value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", title);
        println!("{}", json);
    }
}

fn print_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}
