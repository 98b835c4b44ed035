//! Bounty Manager contract bindings

use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq)]
    interface IBountyManager {
        struct Bounty {
            uint256 id;
            address creator;
            string title;
            string description;
            uint256 amount;
            uint256 deadline;
            uint256 createdAt;
            uint8 status;
        }

        struct Submission {
            address submitter;
            string content;
            uint256 submittedAt;
            uint8 status;
        }

        function bountyCounter() external view returns (uint256);
        function getBounty(uint256 bountyId) external view returns (Bounty memory);
        function getSubmissionCount(uint256 bountyId) external view returns (uint256);
        function getSubmission(uint256 bountyId, uint256 index) external view returns (Submission memory);

        event BountyCreated(uint256 indexed bountyId, address indexed creator, uint256 amount);
        event SubmissionReceived(uint256 indexed bountyId, address indexed submitter, uint256 submissionIndex);
        event WinnersSelected(uint256 indexed bountyId, address[] winners);
        event BountyCancelled(uint256 indexed bountyId);
    }
}
