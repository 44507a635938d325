//! Counter contract bindings.

use alloy_sol_types::sol;

sol! {
    /// Minimal interface of the deployed Counter contract.
    #[sol(rpc)]
    interface ICounter {
        event Incremented(uint256 newCount, address caller);

        function increment() external;
        function getCount() external view returns (uint256);
        function owner() external view returns (address);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::{SolCall, SolEvent};

    use super::ICounter;

    #[test]
    fn test_increment_selector() {
        // keccak256("increment()")[..4]
        assert_eq!(ICounter::incrementCall::SELECTOR, [0xd0, 0x9d, 0xe0, 0x8a]);
        assert_eq!(ICounter::incrementCall {}.abi_encode().len(), 4);
    }

    #[test]
    fn test_incremented_event_roundtrip() {
        let event = ICounter::Incremented { newCount: U256::from(7), caller: Address::repeat_byte(1) };
        let data = event.encode_data();
        let decoded = ICounter::Incremented::abi_decode_data(&data).unwrap();
        assert_eq!(decoded.0, U256::from(7));
        assert_eq!(decoded.1, Address::repeat_byte(1));
    }
}
