use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::database::models::NewEmployee;
use crate::utils::datetime::parse_birth_date;

pub fn validate_person_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Name cannot be empty"));
    }

    Ok(name.to_string())
}

pub fn validate_birth_date(input: &str) -> Result<NaiveDate> {
    parse_birth_date(input)
        .map_err(|_| anyhow!("Invalid date format. Please use YYYY-MM-DD, for example 1990-07-04"))
}

pub fn validate_position_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Position name cannot be empty"));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Position name cannot contain line breaks"));
    }

    Ok(name.to_string())
}

/// Parses the single-line form `First; Last; YYYY-MM-DD; Position[; photo]`.
pub fn parse_employee_line(line: &str) -> Result<NewEmployee> {
    let parts: Vec<&str> = line.split(';').map(str::trim).collect();

    if parts.len() != 4 && parts.len() != 5 {
        return Err(anyhow!(
            "Expected 4 or 5 fields separated by ';' but found {}",
            parts.len()
        ));
    }

    let photo_reference = parts
        .get(4)
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string());

    Ok(NewEmployee {
        first_name: validate_person_name(parts[0])?,
        last_name: validate_person_name(parts[1])?,
        birth_date: validate_birth_date(parts[2])?,
        position_name: validate_position_name(parts[3])?,
        photo_reference,
    })
}
