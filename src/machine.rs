// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Machine ID derivation from the host's private IPv4 address.

use crate::error::{BoxDynError, Error};
use std::{fmt, net::IpAddr, str::FromStr};

/// A local interface address together with its prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub ip: IpAddr,
    pub prefix: u8,
}

impl InterfaceAddr {
    pub fn new(ip: IpAddr, prefix: u8) -> Self {
        Self { ip, prefix }
    }
}

impl fmt::Display for InterfaceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.prefix)
    }
}

/// Parses CIDR notation such as `192.168.1.210/32`.
impl FromStr for InterfaceAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAddress(s.to_string());
        let (ip, prefix) = s.split_once('/').ok_or_else(invalid)?;
        let ip: IpAddr = ip.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        let max_prefix = match ip {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max_prefix {
            return Err(invalid());
        }
        Ok(Self { ip, prefix })
    }
}

/// Picks the machine ID from the first IPv4 address that is neither loopback nor public.
/// The ID is the third and fourth octets read as a big-endian `u16`.
pub fn machine_id_from_addrs(addrs: &[InterfaceAddr]) -> Result<u16, Error> {
    addrs
        .iter()
        .find_map(|addr| match addr.ip {
            IpAddr::V4(ipv4) if !ipv4.is_loopback() && ipv4.is_private() => {
                let octets = ipv4.octets();
                let machine_id = u16::from_be_bytes([octets[2], octets[3]]);
                tracing::debug!(address = %addr, machine_id, "derived machine id");
                Some(machine_id)
            }
            _ => None,
        })
        .ok_or(Error::NoPrivateIPv4)
}

/// Runs `enumerate` and derives the machine ID from its result.
pub fn private_ipv4_machine_id(
    enumerate: &dyn Fn() -> Result<Vec<InterfaceAddr>, BoxDynError>,
) -> Result<u16, Error> {
    let addrs = enumerate().map_err(Error::InterfaceEnumerationFailed)?;
    machine_id_from_addrs(&addrs)
}

/// Lists every address of every local interface, in interface order.
pub fn interface_addrs() -> Result<Vec<InterfaceAddr>, BoxDynError> {
    Ok(pnet_datalink::interfaces()
        .iter()
        .flat_map(|iface| iface.ips.iter())
        .map(|network| InterfaceAddr::new(network.ip(), network.prefix()))
        .collect())
}
