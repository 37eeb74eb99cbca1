use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchOutcome;

/// Counts of one workflow run.
///
/// `sucesso` counts real dispatches only; simulated ones are reported apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    pub processados: u32,
    pub sucesso: u32,
    pub simulados: u32,
    pub falhas: u32,
    pub mensagem: String,
}

impl WorkflowResult {
    pub fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        let mut result = WorkflowResult::default();
        for outcome in outcomes {
            result.processados += 1;
            match outcome {
                DispatchOutcome::Real => result.sucesso += 1,
                DispatchOutcome::Simulated => result.simulados += 1,
                DispatchOutcome::Failed { .. } => result.falhas += 1,
            }
        }
        result.mensagem = result.describe();
        result
    }

    pub fn has_failures(&self) -> bool {
        self.falhas > 0
    }

    fn describe(&self) -> String {
        if self.processados == 0 {
            return "Nenhuma fatura elegível.".to_string();
        }
        let mut msg = format!(
            "{} fatura(s) processada(s): {} com sucesso",
            self.processados, self.sucesso
        );
        if self.simulados > 0 {
            msg.push_str(&format!(", {} simulada(s) sem envio real", self.simulados));
        }
        if self.falhas > 0 {
            msg.push_str(&format!(", {} falha(s)", self.falhas));
        }
        msg.push('.');
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_dispatches_are_not_successes() {
        let result = WorkflowResult::from_outcomes(&[
            DispatchOutcome::Real,
            DispatchOutcome::Simulated,
            DispatchOutcome::Simulated,
            DispatchOutcome::Failed {
                reason: "smtp".into(),
            },
        ]);
        assert_eq!(
            (result.processados, result.sucesso, result.simulados, result.falhas),
            (4, 1, 2, 1)
        );
        assert_eq!(
            result.mensagem,
            "4 fatura(s) processada(s): 1 com sucesso, 2 simulada(s) sem envio real, 1 falha(s)."
        );
    }

    #[test]
    fn nothing_eligible_is_reported_plainly() {
        let result = WorkflowResult::from_outcomes(&[]);
        assert_eq!(result.processados, 0);
        assert_eq!(result.mensagem, "Nenhuma fatura elegível.");
    }
}
