//! Win detection logic for tic-tac-toe.

use super::super::{Board, Move, Player, Square};

/// Winning lines in scan order: rows, columns, main diagonal, anti-diagonal.
const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Checks if there is a winner on the board.
///
/// Returns the owner of the first complete line found in scan order,
/// `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Player> {
    for [a, b, c] in LINES {
        let sq = board.get(Move::from(a));
        if sq == board.get(Move::from(b)) && sq == board.get(Move::from(c)) {
            if let Some(Square::Occupied(player)) = sq {
                return Some(player);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = Board::from_rows([["X", "X", "X"], ["O", "O", ""], ["", "", ""]]).unwrap();
        assert_eq!(check_winner(&board), Some(Player::X));
    }

    #[test]
    fn test_winner_column() {
        let board = Board::from_rows([["X", "O", ""], ["X", "O", ""], ["", "O", "X"]]).unwrap();
        assert_eq!(check_winner(&board), Some(Player::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = Board::from_rows([["X", "X", "O"], ["", "O", ""], ["O", "", "X"]]).unwrap();
        assert_eq!(check_winner(&board), Some(Player::O));
    }

    #[test]
    fn test_scan_order_is_fixed() {
        // Two complete lines cannot arise in legal play, but the answer must be stable.
        let rows = Board::from_rows([["X", "X", "X"], ["O", "O", "O"], ["", "", ""]]).unwrap();
        assert_eq!(check_winner(&rows), Some(Player::X));

        let columns = Board::from_rows([["O", "", "X"], ["O", "", "X"], ["O", "", "X"]]).unwrap();
        assert_eq!(check_winner(&columns), Some(Player::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = Board::from_rows([["X", "X", ""], ["", "O", ""], ["", "", "O"]]).unwrap();
        assert_eq!(check_winner(&board), None);
    }
}
