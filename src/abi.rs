use alloy_sol_types::sol;

sol! {
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);

        function allowance(address owner, address spender) external view returns (uint256 remaining);

        function balanceOf(address owner) external view returns (uint256 balance);
    }

    interface IERC721 {
        function approve(address to, uint256 tokenId) external;

        function getApproved(uint256 tokenId) external view returns (address operator);
    }
}
