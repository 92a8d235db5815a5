use std::collections::HashSet;

use super::Constraint;
use crate::error::{Error, Result};
use crate::parameter::Parameter;

/// Checks a set of constraints against the parameters of a search space.
///
/// Every constraint must be well-formed on its own, reference only known
/// parameters, and not mix discrete with continuous ones. Arithmetic constraints
/// require numerical parameters. At most one dependencies constraint may be
/// given, and cardinality constraints must not share parameters.
///
/// # Errors
///
/// Returns the first violation found, e.g. [`Error::UnknownParameter`],
/// [`Error::MixedConstraintParameters`], [`Error::NonNumericalConstraintParameter`],
/// [`Error::DuplicateDependenciesConstraint`] or
/// [`Error::OverlappingCardinalityConstraints`].
pub fn validate_constraints(constraints: &[Constraint], parameters: &[Parameter]) -> Result<()> {
    let dependencies = constraints
        .iter()
        .filter(|c| matches!(c, Constraint::DiscreteDependencies { .. }))
        .count();
    if dependencies > 1 {
        return Err(Error::DuplicateDependenciesConstraint);
    }

    for constraint in constraints {
        constraint.validate()?;

        let referenced = constraint
            .referenced_parameters()
            .into_iter()
            .map(|name| {
                parameters
                    .iter()
                    .find(|p| p.name() == name)
                    .ok_or_else(|| Error::UnknownParameter {
                        constraint: constraint.kind(),
                        name: name.to_owned(),
                    })
            })
            .collect::<Result<Vec<&Parameter>>>()?;

        if referenced
            .iter()
            .any(|p| p.is_discrete() != constraint.is_discrete())
        {
            return Err(Error::MixedConstraintParameters {
                constraint: constraint.kind(),
            });
        }

        let arithmetic = matches!(
            constraint,
            Constraint::DiscreteSum { .. } | Constraint::DiscreteProduct { .. }
        ) || constraint.is_continuous();
        if arithmetic && let Some(p) = referenced.iter().find(|p| !p.is_numeric()) {
            return Err(Error::NonNumericalConstraintParameter {
                constraint: constraint.kind(),
                name: p.name().to_owned(),
            });
        }
    }

    let cardinality: Vec<HashSet<&str>> = constraints
        .iter()
        .filter(|c| matches!(c, Constraint::ContinuousCardinality { .. }))
        .map(|c| c.parameters().iter().map(String::as_str).collect())
        .collect();
    for (i, a) in cardinality.iter().enumerate() {
        for b in &cardinality[i + 1..] {
            let mut shared: Vec<String> = a.intersection(b).map(|s| (*s).to_owned()).collect();
            if !shared.is_empty() {
                shared.sort();
                return Err(Error::OverlappingCardinalityConstraints { names: shared });
            }
        }
    }
    Ok(())
}
