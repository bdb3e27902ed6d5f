use core::fmt;

/// Battery voltage as sampled by the board, in millivolts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryVoltage {
    pub millivolts: u32,
}

impl BatteryVoltage {
    pub const fn from_millivolts(millivolts: u32) -> Self {
        BatteryVoltage { millivolts }
    }

    /// Volts with two decimals, the way the image server expects them.
    pub fn format(&self) -> Result<heapless::String<12>, fmt::Error> {
        heapless::format!("{}", self)
    }
}

impl fmt::Display for BatteryVoltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let centivolts = (self.millivolts + 5) / 10;
        write!(f, "{}.{:02}", centivolts / 100, centivolts % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rounds_to_centivolts() {
        assert_eq!(BatteryVoltage::from_millivolts(3874).format().unwrap(), "3.87");
        assert_eq!(BatteryVoltage::from_millivolts(3875).format().unwrap(), "3.88");
        assert_eq!(BatteryVoltage::from_millivolts(4200).format().unwrap(), "4.20");
        assert_eq!(BatteryVoltage::from_millivolts(0).format().unwrap(), "0.00");
        assert_eq!(BatteryVoltage::from_millivolts(995).format().unwrap(), "1.00");
    }
}
