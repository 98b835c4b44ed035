//! Verification registry contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface IVerificationRegistry {
        struct Verification {
            bool isVerified;
            uint256 verifiedAt;
            string socialHandle;
            string institutionName;
        }

        function getVerification(address account) external view returns (Verification memory);

        event Verified(address indexed account, uint256 verifiedAt);
    }
}
