use alloy::sol;

// ─── Meme Token Factory ─────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract MemeTokenFactory {
        struct MemeToken {
            string name;
            string symbol;
            string description;
            string tokenImageUrl;
            uint256 fundingRaised;
            address tokenAddress;
            address creatorAddress;
        }

        // === Writes (payable) ===
        function createMemeToken(
            string memory name,
            string memory symbol,
            string memory imageUrl,
            string memory description
        ) public payable returns (address);
        function buyMemeToken(address memeTokenAddress, uint256 tokenQty) public payable returns (uint256);

        // === Registry views ===
        function getAllMemeTokens() public view returns (MemeToken[] memory);
        function addressToMemeTokenMapping(address token) public view returns (
            string memory name,
            string memory symbol,
            string memory description,
            string memory tokenImageUrl,
            uint256 fundingRaised,
            address tokenAddress,
            address creatorAddress
        );

        // === Bonding curve pricing ===
        function calculateCost(uint256 currentSupply, uint256 tokensToBuy) public pure returns (uint256);
        function calculateTokenAmount(uint256 currentSupply, uint256 ethAmount) public pure returns (uint256);
    }
}

// ─── ERC-20 (the tokens the factory mints) ──────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract ERC20 {
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
    }
}
