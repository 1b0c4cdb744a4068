//! Step gating for the simple-mode wizard.
use serde::{Deserialize, Serialize};

use super::fields::{is_other_role, is_table_format};
use super::simple::SimplePromptData;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Rol,
    Objetivo,
    Audiencia,
    Formato,
    Restricciones,
    Tono,
    Criterios,
    Contexto,
}

impl WizardStep {
    pub const ALL: [WizardStep; 8] = [
        WizardStep::Rol,
        WizardStep::Objetivo,
        WizardStep::Audiencia,
        WizardStep::Formato,
        WizardStep::Restricciones,
        WizardStep::Tono,
        WizardStep::Criterios,
        WizardStep::Contexto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Rol => "rol",
            WizardStep::Objetivo => "objetivo",
            WizardStep::Audiencia => "audiencia",
            WizardStep::Formato => "formato",
            WizardStep::Restricciones => "restricciones",
            WizardStep::Tono => "tono",
            WizardStep::Criterios => "criterios",
            WizardStep::Contexto => "contexto",
        }
    }

    pub fn required(&self) -> bool {
        matches!(self, WizardStep::Rol | WizardStep::Objetivo | WizardStep::Formato)
    }

    pub fn is_valid(&self, data: &SimplePromptData) -> bool {
        match self {
            WizardStep::Rol => {
                let role = data.role.trim();
                !role.is_empty() && (!is_other_role(role) || !data.role_custom.trim().is_empty())
            }
            WizardStep::Objetivo => !data.objective.trim().is_empty(),
            WizardStep::Formato => {
                let format = data.format.trim();
                !format.is_empty() && (!is_table_format(format) || !data.format_columns.is_empty())
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Current,
    Completed,
    Error,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub index: usize,
    pub step: WizardStep,
    pub required: bool,
    pub valid: bool,
    pub status: StepStatus,
}

/// First required step before `target` that fails its check.
pub fn first_blocking_step(data: &SimplePromptData, target: usize) -> Option<WizardStep> {
    WizardStep::ALL
        .iter()
        .take(target)
        .find(|step| step.required() && !step.is_valid(data))
        .copied()
}

pub fn can_navigate(data: &SimplePromptData, current: usize, target: usize) -> bool {
    target <= current || first_blocking_step(data, target).is_none()
}

pub fn step_status(data: &SimplePromptData, current: usize, index: usize) -> StepStatus {
    let Some(step) = WizardStep::ALL.get(index) else {
        return StepStatus::Pending;
    };
    if index == current {
        StepStatus::Current
    } else if index > current {
        StepStatus::Pending
    } else if step.required() && !step.is_valid(data) {
        StepStatus::Error
    } else {
        StepStatus::Completed
    }
}

pub fn step_views(data: &SimplePromptData, current: usize) -> Vec<StepView> {
    WizardStep::ALL
        .iter()
        .enumerate()
        .map(|(index, step)| StepView {
            index,
            step: *step,
            required: step.required(),
            valid: step.is_valid(data),
            status: step_status(data, current, index),
        })
        .collect()
}

/// Cursor over the wizard steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    current: usize,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> WizardStep {
        WizardStep::ALL[self.current]
    }

    pub fn go_to(&mut self, target: usize, data: &SimplePromptData) -> AppResult<()> {
        if target >= WizardStep::ALL.len() {
            return Err(AppError::InvalidRequest(format!("no wizard step {}", target)));
        }
        if target > self.current {
            if let Some(step) = first_blocking_step(data, target) {
                return Err(AppError::WizardBlocked {
                    step: step.name().to_string(),
                });
            }
        }
        self.current = target;
        Ok(())
    }

    pub fn next(&mut self, data: &SimplePromptData) -> AppResult<()> {
        self.go_to(self.current + 1, data)
    }

    pub fn back(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn views(&self, data: &SimplePromptData) -> Vec<StepView> {
        step_views(data, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATO: usize = 3;

    fn with_pillars() -> SimplePromptData {
        SimplePromptData {
            role: "Analista".into(),
            objective: "resumir".into(),
            format: "Lista".into(),
            ..Default::default()
        }
    }

    #[test]
    fn table_needs_a_column() {
        let mut data = with_pillars();
        data.format = "Table".into();
        assert!(!WizardStep::Formato.is_valid(&data));
        data.format_columns.push("Nombre".into());
        assert!(WizardStep::Formato.is_valid(&data));
    }

    #[test]
    fn other_role_needs_custom_text() {
        let mut data = with_pillars();
        data.role = "Other".into();
        assert!(!WizardStep::Rol.is_valid(&data));
        data.role_custom = "Chef".into();
        assert!(WizardStep::Rol.is_valid(&data));
    }

    #[test]
    fn forward_blocked_by_earlier_required_step() {
        let data = SimplePromptData {
            role: "Analista".into(),
            ..Default::default()
        };
        assert!(can_navigate(&data, 0, 1));
        assert!(!can_navigate(&data, 0, 2));
        assert_eq!(first_blocking_step(&data, 7), Some(WizardStep::Objetivo));
    }

    #[test]
    fn backward_always_allowed() {
        let data = SimplePromptData::default();
        assert!(can_navigate(&data, 5, 2));
        assert!(can_navigate(&data, 5, 5));
    }

    #[test]
    fn optional_steps_do_not_block() {
        let data = with_pillars();
        assert!(can_navigate(&data, 0, 7));
    }

    #[test]
    fn statuses_follow_position_and_validity() {
        let mut data = with_pillars();
        data.objective.clear();
        let views = step_views(&data, FORMATO);
        assert_eq!(views[0].status, StepStatus::Completed);
        assert_eq!(views[1].status, StepStatus::Error);
        assert_eq!(views[2].status, StepStatus::Completed);
        assert_eq!(views[3].status, StepStatus::Current);
        assert_eq!(views[4].status, StepStatus::Pending);
    }

    #[test]
    fn wizard_cursor_moves_and_reports_block() {
        let mut wizard = Wizard::new();
        let mut data = SimplePromptData::default();
        match wizard.next(&data) {
            Err(AppError::WizardBlocked { step }) => assert_eq!(step, "rol"),
            other => panic!("expected block, got {:?}", other),
        }
        data.role = "Analista".into();
        wizard.next(&data).unwrap();
        assert_eq!(wizard.current_step(), WizardStep::Objetivo);
        wizard.back();
        assert_eq!(wizard.current(), 0);
        assert!(wizard.go_to(8, &data).is_err());
    }
}
