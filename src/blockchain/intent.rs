//! Offline construction of unsigned transaction intents.
//!
//! An intent describes what a transaction should do. Turning it into bytes
//! (gas selection, object versions) is left to the resolution backend.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::blockchain::address::SuiAddress;

pub const MIST_PER_SUI: u64 = 1_000_000_000;
pub const DEFAULT_CALL_GAS_BUDGET: u64 = 50_000_000;
pub const DEFAULT_PUBLISH_GAS_BUDGET: u64 = 200_000_000;

#[derive(Error, Debug, PartialEq)]
pub enum IntentError {
    #[error("amount must be a positive number of SUI, got {0}")]
    InvalidAmount(f64),
    #[error("amount {0} SUI is smaller than 1 MIST")]
    AmountTooSmall(f64),
    #[error("amount {0} SUI is too large")]
    AmountTooLarge(f64),
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },
    #[error("invalid Move target '{0}': expected package::module::function")]
    InvalidTarget(String),
    #[error("compiled package contains no modules")]
    NoModules,
    #[error("module {0} is not valid base64")]
    InvalidModule(usize),
}

/// Converts SUI to MIST, flooring any fraction below 1 MIST.
pub fn sui_to_mist(amount: f64) -> Result<u64, IntentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(IntentError::InvalidAmount(amount));
    }
    let mist = (amount * MIST_PER_SUI as f64).floor();
    if mist < 1.0 {
        return Err(IntentError::AmountTooSmall(amount));
    }
    if mist >= u64::MAX as f64 {
        return Err(IntentError::AmountTooLarge(amount));
    }
    Ok(mist as u64)
}

fn parse_address(value: &str) -> Result<SuiAddress, IntentError> {
    value.parse().map_err(|e: crate::blockchain::address::AddressParseError| {
        IntentError::InvalidAddress {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTarget {
    pub package: SuiAddress,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    pub fn new(package: &str, module: &str, function: &str) -> Result<Self, IntentError> {
        let is_ident = |s: &str| {
            !s.is_empty()
                && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !s.starts_with(|c: char| c.is_ascii_digit())
        };
        if !is_ident(module) || !is_ident(function) {
            return Err(IntentError::InvalidTarget(format!(
                "{}::{}::{}",
                package, module, function
            )));
        }
        Ok(Self {
            package: parse_address(package)?,
            module: module.to_string(),
            function: function.to_string(),
        })
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// A Move call argument: `0x`-prefixed values reference objects, anything else
/// is passed as a pure string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Object(SuiAddress),
    Pure(String),
}

impl CallArg {
    pub fn parse(raw: &str) -> Result<Self, IntentError> {
        if raw.starts_with("0x") {
            parse_address(raw).map(CallArg::Object)
        } else {
            Ok(CallArg::Pure(raw.to_string()))
        }
    }
}

/// Output of `sui move build --dump-bytecode-as-base64`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompiledPackage {
    pub modules: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntentKind {
    /// Split `amount_mist` off the gas coin and send it to `recipient`.
    Transfer {
        recipient: SuiAddress,
        amount_mist: u64,
    },
    MoveCall {
        target: MoveTarget,
        type_args: Vec<String>,
        args: Vec<CallArg>,
    },
    /// Publish the modules; the upgrade capability goes to the sender.
    Publish {
        modules: Vec<String>,
        dependencies: Vec<SuiAddress>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionIntent {
    kind: IntentKind,
    sender: Option<SuiAddress>,
    gas_budget: Option<u64>,
}

impl TransactionIntent {
    pub fn new(kind: IntentKind) -> Self {
        Self {
            kind,
            sender: None,
            gas_budget: None,
        }
    }

    pub fn transfer(recipient: &str, amount_sui: f64) -> Result<Self, IntentError> {
        Ok(Self::new(IntentKind::Transfer {
            recipient: parse_address(recipient)?,
            amount_mist: sui_to_mist(amount_sui)?,
        }))
    }

    pub fn move_call(
        target: MoveTarget,
        type_args: Vec<String>,
        args: &[String],
        gas_budget: u64,
    ) -> Result<Self, IntentError> {
        let args = args
            .iter()
            .map(|a| CallArg::parse(a))
            .collect::<Result<Vec<_>, _>>()?;
        let mut intent = Self::new(IntentKind::MoveCall {
            target,
            type_args,
            args,
        });
        intent.set_gas_budget(gas_budget);
        Ok(intent)
    }

    pub fn publish(package: CompiledPackage, gas_budget: u64) -> Result<Self, IntentError> {
        if package.modules.is_empty() {
            return Err(IntentError::NoModules);
        }
        for (index, module) in package.modules.iter().enumerate() {
            BASE64
                .decode(module)
                .map_err(|_| IntentError::InvalidModule(index))?;
        }
        let dependencies = package
            .dependencies
            .iter()
            .map(|d| parse_address(d))
            .collect::<Result<Vec<_>, _>>()?;
        let mut intent = Self::new(IntentKind::Publish {
            modules: package.modules,
            dependencies,
        });
        intent.set_gas_budget(gas_budget);
        Ok(intent)
    }

    /// Leaves an existing sender untouched.
    pub fn set_sender_if_not_set(&mut self, sender: SuiAddress) {
        self.sender.get_or_insert(sender);
    }

    pub fn set_gas_budget(&mut self, budget: u64) {
        self.gas_budget = Some(budget);
    }

    pub fn kind(&self) -> &IntentKind {
        &self.kind
    }

    pub fn sender(&self) -> Option<SuiAddress> {
        self.sender
    }

    pub fn gas_budget(&self) -> Option<u64> {
        self.gas_budget
    }
}

/// Caller-supplied parameters for each intent kind.
#[derive(Debug, Clone)]
pub enum IntentRequest {
    Transfer {
        recipient: String,
        amount_sui: f64,
    },
    Call {
        package_id: String,
        module: String,
        function: String,
        type_args: Vec<String>,
        args: Vec<String>,
        gas_budget: u64,
    },
    Publish {
        package: CompiledPackage,
        gas_budget: u64,
    },
}

/// Builds the intent for `request` with `sender` attached.
pub fn assemble(
    request: IntentRequest,
    sender: SuiAddress,
) -> Result<TransactionIntent, IntentError> {
    let mut intent = match request {
        IntentRequest::Transfer {
            recipient,
            amount_sui,
        } => TransactionIntent::transfer(&recipient, amount_sui)?,
        IntentRequest::Call {
            package_id,
            module,
            function,
            type_args,
            args,
            gas_budget,
        } => {
            let target = MoveTarget::new(&package_id, &module, &function)?;
            TransactionIntent::move_call(target, type_args, &args, gas_budget)?
        }
        IntentRequest::Publish {
            package,
            gas_budget,
        } => TransactionIntent::publish(package, gas_budget)?,
    };
    intent.set_sender_if_not_set(sender);
    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> SuiAddress {
        s.parse().unwrap()
    }

    #[test]
    fn converts_sui_to_mist_with_floor() {
        assert_eq!(sui_to_mist(1.5), Ok(1_500_000_000));
        assert_eq!(sui_to_mist(0.0000001), Ok(100));
        assert_eq!(sui_to_mist(2.0), Ok(2_000_000_000));
        assert_eq!(sui_to_mist(0.000000001), Ok(1));
    }

    #[test]
    fn rejects_unusable_amounts() {
        assert_eq!(sui_to_mist(0.0), Err(IntentError::InvalidAmount(0.0)));
        assert_eq!(sui_to_mist(-1.0), Err(IntentError::InvalidAmount(-1.0)));
        assert!(matches!(sui_to_mist(f64::NAN), Err(IntentError::InvalidAmount(_))));
        assert_eq!(
            sui_to_mist(0.0000000001),
            Err(IntentError::AmountTooSmall(0.0000000001))
        );
        assert_eq!(sui_to_mist(1e12), Err(IntentError::AmountTooLarge(1e12)));
    }

    #[test]
    fn sender_is_only_set_once() {
        let mut intent = TransactionIntent::transfer("0xab", 1.0).unwrap();
        intent.set_sender_if_not_set(addr("0x1"));
        intent.set_sender_if_not_set(addr("0x2"));
        assert_eq!(intent.sender(), Some(addr("0x1")));
    }

    #[test]
    fn call_arguments_split_objects_from_pure_values() {
        let request = IntentRequest::Call {
            package_id: "0x2".into(),
            module: "coin".into(),
            function: "join".into(),
            type_args: vec!["0x2::sui::SUI".into()],
            args: vec!["0xc0ffee".into(), "hello".into()],
            gas_budget: DEFAULT_CALL_GAS_BUDGET,
        };
        let intent = assemble(request, addr("0x5")).unwrap();
        assert_eq!(intent.sender(), Some(addr("0x5")));
        assert_eq!(intent.gas_budget(), Some(DEFAULT_CALL_GAS_BUDGET));
        match intent.kind() {
            IntentKind::MoveCall { target, args, .. } => {
                assert_eq!(target.module, "coin");
                assert_eq!(
                    args,
                    &vec![CallArg::Object(addr("0xc0ffee")), CallArg::Pure("hello".into())]
                );
            }
            other => panic!("unexpected intent {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_targets() {
        assert!(matches!(
            MoveTarget::new("0x2", "coin::x", "join"),
            Err(IntentError::InvalidTarget(_))
        ));
        assert!(matches!(
            MoveTarget::new("not-hex", "coin", "join"),
            Err(IntentError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn publish_validates_modules() {
        let empty = CompiledPackage {
            modules: vec![],
            dependencies: vec![],
        };
        assert_eq!(
            TransactionIntent::publish(empty, DEFAULT_PUBLISH_GAS_BUDGET),
            Err(IntentError::NoModules)
        );

        let package = CompiledPackage {
            modules: vec!["oRzrCwYAAAA=".into(), "%%%".into()],
            dependencies: vec!["0x1".into(), "0x2".into()],
        };
        assert_eq!(
            TransactionIntent::publish(package, DEFAULT_PUBLISH_GAS_BUDGET),
            Err(IntentError::InvalidModule(1))
        );
    }
}
