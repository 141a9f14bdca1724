use anyhow::Context;

use crate::model::engine::Scenario;

/// Load a scenario from a TOML file.
///
/// ```toml
/// periods = 10
///
/// [parameters]
/// p_CS = 0.05
/// p_SC = 0.20
/// policy = "weighted_influence"
/// A = [[0.7, 0.1, 0.1, 0.1], [0.1, 0.7, 0.1, 0.1], [0.1, 0.1, 0.7, 0.1], [0.1, 0.1, 0.1, 0.7]]
///
/// [initial_conditions]
/// C_1 = 0.2
/// S_1 = 0.6
/// D_1 = 0.2
/// ```
pub fn load_scenario_toml(path: impl AsRef<std::path::Path>) -> anyhow::Result<Scenario> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
    parse_scenario_toml(&text).with_context(|| format!("Invalid scenario file: {}", path.display()))
}

/// Parse scenario TOML and check it up front, so a bad file fails before any run.
pub fn parse_scenario_toml(text: &str) -> anyhow::Result<Scenario> {
    let scenario: Scenario = toml::from_str(text).context("TOML parse failed")?;
    scenario.periods()?;
    scenario.parameters.resolve()?;
    scenario.initial_conditions.check()?;
    Ok(scenario)
}
