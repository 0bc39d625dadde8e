//! Cross-crate integration flows.

#[cfg(test)]
mod key_portability;
#[cfg(test)]
mod persistence;
#[cfg(test)]
mod signing_flows;
#[cfg(test)]
mod validation_flows;
