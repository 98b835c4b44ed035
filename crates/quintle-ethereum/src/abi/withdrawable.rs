//! Pull-payment interface shared by every contract holding pending balances

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IWithdrawable {
        function pendingWithdrawals(address account, address token) external view returns (uint256);
        function withdraw(address token) external;
    }
}
