//! Funding Request Manager contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface IFundingRequestManager {
        struct FundingRequest {
            uint256 id;
            address requester;
            string title;
            string description;
            uint256 amountRequested;
            uint256 amountFunded;
            uint256 milestoneCount;
            uint256 deadline;
            uint256 createdAt;
            uint8 status;
        }

        struct Update {
            address author;
            string content;
            uint256 postedAt;
        }

        function requestCounter() external view returns (uint256);
        function getRequest(uint256 requestId) external view returns (FundingRequest memory);
        function getUpdateCount(uint256 requestId) external view returns (uint256);
        function getUpdate(uint256 requestId, uint256 index) external view returns (Update memory);

        event RequestCreated(uint256 indexed requestId, address indexed requester, uint256 amountRequested);
        event RequestFunded(uint256 indexed requestId, address indexed funder, uint256 amount);
        event UpdatePosted(uint256 indexed requestId, uint256 updateIndex);
        event MilestoneReleased(uint256 indexed requestId, uint256 milestoneIndex, uint256 amount);
    }
}
