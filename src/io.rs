use serde::Deserialize;

use crate::elements::Element;
use crate::error::RotorError;
use crate::rotor::Rotor;

/// On-disk rotor description: a YAML document listing elements by kind.
#[derive(Debug, Deserialize)]
pub struct RotorFile {
    #[serde(default)]
    pub tag: Option<String>,
    pub elements: Vec<Element>,
}

/// Reads a rotor model from a YAML file.
pub fn read_rotor_from_file(file_path: &str) -> Result<Rotor, RotorError> {
    let yaml = std::fs::read_to_string(file_path)?;
    read_rotor_from_str(&yaml)
}

pub fn read_rotor_from_str(yaml: &str) -> Result<Rotor, RotorError> {
    let file: RotorFile = serde_yaml::from_str(yaml)?;
    let mut rotor = Rotor::new(file.elements)?;
    rotor.tag = file.tag;
    Ok(rotor)
}
