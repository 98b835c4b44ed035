//! Quest Manager contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface IQuestManager {
        struct Quest {
            uint256 id;
            address creator;
            string title;
            string description;
            uint256 rewardPerQualifier;
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

        function questCounter() external view returns (uint256);
        function getQuest(uint256 questId) external view returns (Quest memory);
        function getEntryCount(uint256 questId) external view returns (uint256);
        function getEntry(uint256 questId, uint256 index) external view returns (Entry memory);

        event QuestCreated(uint256 indexed questId, address indexed creator, uint256 rewardPool);
        event EntrySubmitted(uint256 indexed questId, address indexed participant, uint256 entryIndex);
        event QuestResolved(uint256 indexed questId, uint256 winnersCount);
        event QuestCancelled(uint256 indexed questId);
    }
}
