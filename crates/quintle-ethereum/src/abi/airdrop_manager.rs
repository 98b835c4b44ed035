//! Airdrop Manager contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface IAirdropManager {
        struct Airdrop {
            uint256 id;
            address creator;
            string title;
            string description;
            address token;
            uint256 totalAmount;
            uint256 perUserAmount;
            uint256 maxQualifiers;
            uint256 qualifiersCount;
            uint256 deadline;
            uint256 createdAt;
            bool resolved;
            bool cancelled;
        }

        struct Entry {
            address participant;
            string content;
            uint256 submittedAt;
            uint8 status;
        }

        function airdropCounter() external view returns (uint256);
        function getAirdrop(uint256 airdropId) external view returns (Airdrop memory);
        function getEntryCount(uint256 airdropId) external view returns (uint256);
        function getEntry(uint256 airdropId, uint256 index) external view returns (Entry memory);

        event AirdropCreated(uint256 indexed airdropId, address indexed creator, address token);
        event AirdropEntrySubmitted(uint256 indexed airdropId, address indexed participant);
        event AirdropResolved(uint256 indexed airdropId, uint256 qualifiersCount);
        event AirdropCancelled(uint256 indexed airdropId);
    }
}
