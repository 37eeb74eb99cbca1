use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billops_core::{Aggregate, AggregateRoot, DomainError, DomainEvent, DomainResult, Entity, SupplierId};

/// Records that still reference a supplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierDependencies {
    pub faturas_abertas: u32,
    pub contas_pagar_abertas: u32,
    pub contratos_vinculados: u32,
    pub contratos_assinados: u32,
}

impl SupplierDependencies {
    pub fn is_empty(&self) -> bool {
        self.faturas_abertas == 0
            && self.contas_pagar_abertas == 0
            && self.contratos_vinculados == 0
            && self.contratos_assinados == 0
    }

    /// Linked contracts that have not been signed.
    pub fn contratos_nao_assinados(&self) -> u32 {
        self.contratos_vinculados.saturating_sub(self.contratos_assinados)
    }
}

/// Supplier (fornecedor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    id: SupplierId,
    nome: String,
    #[serde(default)]
    documento: Option<String>,
    #[serde(default)]
    email: Option<String>,
    ativo: bool,
    #[serde(default)]
    dependencias: SupplierDependencies,
    #[serde(default)]
    version: u64,
}

/// Command: register a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSupplier {
    pub supplier_id: SupplierId,
    pub nome: String,
    pub documento: Option<String>,
    pub email: Option<String>,
}

impl Supplier {
    /// Registration: new suppliers start active and without dependents.
    pub fn register(cmd: RegisterSupplier) -> DomainResult<Self> {
        if cmd.nome.trim().is_empty() {
            return Err(DomainError::validation("supplier nome must not be empty"));
        }

        Ok(Self {
            id: cmd.supplier_id,
            nome: cmd.nome,
            documento: cmd.documento,
            email: cmd.email,
            ativo: true,
            dependencias: SupplierDependencies::default(),
            version: 0,
        })
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.id
    }

    pub fn nome(&self) -> &str {
        &self.nome
    }

    pub fn documento(&self) -> Option<&str> {
        self.documento.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.ativo
    }

    pub fn dependencias(&self) -> SupplierDependencies {
        self.dependencias
    }

    pub fn with_dependencias(mut self, dependencias: SupplierDependencies) -> Self {
        self.dependencias = dependencias;
        self
    }
}

impl AggregateRoot for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_ref(&self) -> String {
        self.nome.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplierCommand {
    Activate { occurred_at: DateTime<Utc> },
    Deactivate { occurred_at: DateTime<Utc> },
    RecordDependencies {
        dependencias: SupplierDependencies,
        occurred_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupplierEvent {
    SupplierActivated {
        supplier_id: SupplierId,
        occurred_at: DateTime<Utc>,
    },
    SupplierDeactivated {
        supplier_id: SupplierId,
        occurred_at: DateTime<Utc>,
    },
    DependenciesRecorded {
        supplier_id: SupplierId,
        dependencias: SupplierDependencies,
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent for SupplierEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SupplierEvent::SupplierActivated { .. } => "parties.supplier.activated",
            SupplierEvent::SupplierDeactivated { .. } => "parties.supplier.deactivated",
            SupplierEvent::DependenciesRecorded { .. } => "parties.supplier.dependencies_recorded",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SupplierEvent::SupplierActivated { occurred_at, .. }
            | SupplierEvent::SupplierDeactivated { occurred_at, .. }
            | SupplierEvent::DependenciesRecorded { occurred_at, .. } => *occurred_at,
        }
    }
}

impl Aggregate for Supplier {
    type Command = SupplierCommand;
    type Event = SupplierEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SupplierEvent::SupplierActivated { .. } => self.ativo = true,
            SupplierEvent::SupplierDeactivated { .. } => self.ativo = false,
            SupplierEvent::DependenciesRecorded { dependencias, .. } => {
                self.dependencias = *dependencias;
            }
        }
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SupplierCommand::Activate { occurred_at } => {
                if self.ativo {
                    return Err(DomainError::invariant("supplier is already active"));
                }
                Ok(vec![SupplierEvent::SupplierActivated {
                    supplier_id: self.id,
                    occurred_at: *occurred_at,
                }])
            }
            SupplierCommand::Deactivate { occurred_at } => {
                if !self.ativo {
                    return Err(DomainError::invariant("supplier is already inactive"));
                }
                Ok(vec![SupplierEvent::SupplierDeactivated {
                    supplier_id: self.id,
                    occurred_at: *occurred_at,
                }])
            }
            SupplierCommand::RecordDependencies {
                dependencias,
                occurred_at,
            } => {
                if dependencias.contratos_assinados > dependencias.contratos_vinculados {
                    return Err(DomainError::validation(
                        "signed contracts cannot exceed linked contracts",
                    ));
                }
                Ok(vec![SupplierEvent::DependenciesRecorded {
                    supplier_id: self.id,
                    dependencias: *dependencias,
                    occurred_at: *occurred_at,
                }])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billops_core::execute;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn supplier() -> Supplier {
        Supplier::register(RegisterSupplier {
            supplier_id: SupplierId::from_u128(3),
            nome: "Papelaria Central".to_string(),
            documento: Some("12.345.678/0001-90".to_string()),
            email: None,
        })
        .unwrap()
    }

    #[test]
    fn register_rejects_blank_name() {
        let err = Supplier::register(RegisterSupplier {
            supplier_id: SupplierId::from_u128(1),
            nome: "  ".to_string(),
            documento: None,
            email: None,
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn deactivate_then_activate() {
        let mut s = supplier();
        assert!(s.is_active());

        execute(&mut s, &SupplierCommand::Deactivate { occurred_at: at() }).unwrap();
        assert!(!s.is_active());
        assert_eq!(AggregateRoot::id(&s), &SupplierId::from_u128(3));

        let err = s.handle(&SupplierCommand::Deactivate { occurred_at: at() }).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        execute(&mut s, &SupplierCommand::Activate { occurred_at: at() }).unwrap();
        assert!(s.is_active());
        assert_eq!(s.version(), 2);
    }

    #[test]
    fn dependencies_are_validated() {
        let s = supplier();
        let bad = SupplierDependencies {
            contratos_vinculados: 1,
            contratos_assinados: 2,
            ..SupplierDependencies::default()
        };
        assert!(
            s.handle(&SupplierCommand::RecordDependencies {
                dependencias: bad,
                occurred_at: at(),
            })
            .is_err()
        );

        let deps = SupplierDependencies {
            contratos_vinculados: 3,
            contratos_assinados: 1,
            ..SupplierDependencies::default()
        };
        assert_eq!(deps.contratos_nao_assinados(), 2);
        assert!(!deps.is_empty());
    }

    #[test]
    fn deserializes_without_dependency_markers() {
        let json = serde_json::json!({
            "id": SupplierId::from_u128(9),
            "nome": "Gráfica Norte",
            "ativo": false,
        });
        let s: Supplier = serde_json::from_value(json).unwrap();
        assert!(!s.is_active());
        assert!(s.dependencias().is_empty());
        assert_eq!(s.display_ref(), "Gráfica Norte");
    }
}
